pub mod loader;

use chrono::{NaiveDate, NaiveDateTime};
use ndarray::{Array1, ArrayView1};
use std::path::PathBuf;
use thiserror::Error;

/// A single price observation. Intraday sources keep their time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        Self { timestamp, price }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Raw or standardized observations of one asset, ordered by timestamp.
#[derive(Debug, Clone)]
pub struct Series {
    pub asset: String,
    pub points: Vec<PricePoint>,
}

impl Series {
    pub fn new(asset: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            asset: asset.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// One value per calendar day, strictly increasing dates.
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub asset: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Bitcoin and gold values sharing one ordered date axis.
#[derive(Debug, Clone)]
pub struct AlignedSeriesPair {
    dates: Vec<NaiveDate>,
    bitcoin: Array1<f64>,
    gold: Array1<f64>,
}

impl AlignedSeriesPair {
    /// Builds a pair, rejecting mismatched lengths, unordered dates and
    /// non-finite values.
    pub fn new(dates: Vec<NaiveDate>, bitcoin: Vec<f64>, gold: Vec<f64>) -> Result<Self> {
        if dates.len() != bitcoin.len() || dates.len() != gold.len() {
            return Err(DataError::MisalignedSeries(format!(
                "length mismatch: {} dates, {} bitcoin values, {} gold values",
                dates.len(),
                bitcoin.len(),
                gold.len()
            )));
        }

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(DataError::MisalignedSeries(format!(
                "dates not strictly increasing at {}",
                pair[1]
            )));
        }

        for (asset, values) in [("bitcoin", &bitcoin), ("gold", &gold)] {
            if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
                return Err(DataError::InsufficientData {
                    asset: asset.to_string(),
                    reason: format!("undefined value on {}", dates[idx]),
                });
            }
        }

        Ok(Self {
            dates,
            bitcoin: Array1::from(bitcoin),
            gold: Array1::from(gold),
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn bitcoin(&self) -> ArrayView1<'_, f64> {
        self.bitcoin.view()
    }

    pub fn gold(&self) -> ArrayView1<'_, f64> {
        self.gold.view()
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Cannot open input file {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column '{column}' in {asset} data")]
    MissingColumn { asset: String, column: String },
    #[error("Cannot parse {asset} column '{column}' at line {line}: '{value}'")]
    Parse {
        asset: String,
        column: String,
        line: u64,
        value: String,
    },
    #[error("No {asset} rows between {start} and {end}")]
    EmptyRange {
        asset: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Insufficient {asset} data: {reason}")]
    InsufficientData { asset: String, reason: String },
    #[error("{asset} prices are constant between {start} and {end}, cannot standardize")]
    ZeroVariance {
        asset: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Bitcoin and gold series share no dates")]
    EmptyIntersection,
    #[error("Aligned series are inconsistent: {0}")]
    MisalignedSeries(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
