use super::{DataError, PricePoint, Result, Series};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%Y%m%d"];

// Shorter integers are years or compact dates, never epoch seconds.
const EPOCH_MIN_DIGITS: usize = 9;

// Larger integers are taken as milliseconds rather than seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub struct DataLoader;

impl DataLoader {
    /// Load `(date_column, price_column)` pairs for one asset from a CSV file.
    pub fn load_prices<P: AsRef<Path>>(
        path: P,
        asset: &str,
        date_column: &str,
        price_column: &str,
    ) -> Result<Series> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Reading {} prices from {}", asset, path.display());
        Self::read_prices(file, asset, date_column, price_column)
    }

    /// Same as [`DataLoader::load_prices`] but from any reader.
    pub fn read_prices<R: Read>(
        reader: R,
        asset: &str,
        date_column: &str,
        price_column: &str,
    ) -> Result<Series> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let date_idx = Self::column_index(&headers, date_column).ok_or_else(|| {
            DataError::MissingColumn {
                asset: asset.to_string(),
                column: date_column.to_string(),
            }
        })?;
        let price_idx = Self::column_index(&headers, price_column).ok_or_else(|| {
            DataError::MissingColumn {
                asset: asset.to_string(),
                column: price_column.to_string(),
            }
        })?;

        let mut points = Vec::new();
        let mut skipped = 0usize;
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            // Header occupies line 1.
            let line = record
                .position()
                .map(|pos| pos.line())
                .unwrap_or(row as u64 + 2);

            let raw_date = record.get(date_idx).unwrap_or("");
            let timestamp = parse_timestamp(raw_date).ok_or_else(|| DataError::Parse {
                asset: asset.to_string(),
                column: date_column.to_string(),
                line,
                value: raw_date.to_string(),
            })?;

            let raw_price = record.get(price_idx).unwrap_or("");
            match parse_price(raw_price) {
                Ok(Some(price)) => points.push(PricePoint::new(timestamp, price)),
                Ok(None) => skipped += 1,
                Err(()) => {
                    return Err(DataError::Parse {
                        asset: asset.to_string(),
                        column: price_column.to_string(),
                        line,
                        value: raw_price.to_string(),
                    })
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} {} rows with a missing price", skipped, asset);
        }
        log::info!("Loaded {} {} rows", points.len(), asset);

        Ok(Series::new(asset, points))
    }

    fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
        headers.iter().position(|h| h == name).or_else(|| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
        })
    }
}

/// Parse the timestamp layouts found in daily and intraday price exports.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.len() < EPOCH_MIN_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let epoch: i64 = raw.parse().ok()?;
    let dt = if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    dt.map(|dt| dt.naive_utc())
}

// Ok(None) marks a missing value.
fn parse_price(raw: &str) -> std::result::Result<Option<f64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(()),
    }
}
