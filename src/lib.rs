pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod visualization;

pub use analysis::rolling::{CorrelationPoint, CorrelationSeries, RollingRegression};
pub use cli::Cli;
pub use config::Config;
pub use pipeline::compute_correlation_series;
