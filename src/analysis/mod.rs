pub mod alignment;
pub mod rolling;
pub mod standardize;
