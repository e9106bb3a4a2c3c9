use crate::data::AlignedSeriesPair;
use chrono::NaiveDate;
use ndarray::{s, Array1, ArrayView1};
use ndarray_stats::QuantileExt;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollingError {
    #[error("Window size must be at least 2, got {0}")]
    InvalidWindow(usize),
    #[error("Insufficient data: {len} aligned days for a window of {window}")]
    InsufficientData { len: usize, window: usize },
    #[error("Degenerate window ending {end_date}: bitcoin prices have zero variance")]
    DegenerateWindow { end_date: NaiveDate },
}

pub type Result<T> = std::result::Result<T, RollingError>;

/// Slope of the window ending on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub date: NaiveDate,
    pub slope: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationSummary {
    pub count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub min_slope: f64,
    pub max_slope: f64,
    pub mean_slope: f64,
    pub latest_slope: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationSeries {
    points: Vec<CorrelationPoint>,
}

impl CorrelationSeries {
    pub fn new(points: Vec<CorrelationPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[CorrelationPoint] {
        &self.points
    }

    pub fn slopes(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.slope).collect()
    }

    pub fn summary(&self) -> Option<CorrelationSummary> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        let slopes = self.slopes();

        Some(CorrelationSummary {
            count: self.points.len(),
            first_date: first.date,
            last_date: last.date,
            min_slope: *slopes.min().ok()?,
            max_slope: *slopes.max().ok()?,
            mean_slope: slopes.mean()?,
            latest_slope: last.slope,
        })
    }
}

/// Right-anchored rolling OLS of gold on bitcoin.
#[derive(Debug, Clone, Copy)]
pub struct RollingRegression {
    window_size: usize,
}

impl RollingRegression {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 2 {
            return Err(RollingError::InvalidWindow(window_size));
        }
        Ok(Self { window_size })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One point per window `[i, i + W)`, dated with the window's last day.
    pub fn estimate(&self, pair: &AlignedSeriesPair) -> Result<CorrelationSeries> {
        let n = pair.len();
        let w = self.window_size;
        if n < w {
            return Err(RollingError::InsufficientData { len: n, window: w });
        }

        let x = pair.bitcoin();
        let y = pair.gold();
        let dates = pair.dates();

        let mut points = Vec::with_capacity(n - w + 1);
        for start in 0..=(n - w) {
            let end = start + w;
            let end_date = dates[end - 1];
            let slope = ols_slope(x.slice(s![start..end]), y.slice(s![start..end]))
                .ok_or(RollingError::DegenerateWindow { end_date })?;
            points.push(CorrelationPoint {
                date: end_date,
                slope,
            });
        }

        log::info!("Estimated {} windows of {} days", points.len(), w);
        Ok(CorrelationSeries::new(points))
    }
}

/// Slope of the least-squares line `y = a + b x`.
///
/// Returns `None` when `x` has no variance relative to its magnitude.
pub fn ols_slope(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mean_x = x.mean()?;
    let mean_y = y.mean()?;
    let dx = x.mapv(|v| v - mean_x);
    let dy = y.mapv(|v| v - mean_y);

    let sxx = dx.dot(&dx);
    let scale = x.dot(&x);
    if !sxx.is_finite() || sxx <= f64::EPSILON * scale {
        return None;
    }

    let slope = dx.dot(&dy) / sxx;
    slope.is_finite().then_some(slope)
}
