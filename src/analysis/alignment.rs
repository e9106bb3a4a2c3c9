use crate::data::{AlignedSeriesPair, DailySeries, DataError, Result, Series};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Resample to one value per calendar day.
///
/// Each day holds the mean of its observations. Days without observations
/// between the first and last observed day repeat the previous day's value.
/// The span starts at the first observed day, so every day is defined.
pub fn resample_daily(series: &Series) -> DailySeries {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for point in &series.points {
        let bucket = buckets.entry(point.date()).or_insert((0.0, 0));
        bucket.0 += point.price;
        bucket.1 += 1;
    }

    let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => {
            return DailySeries {
                asset: series.asset.clone(),
                dates: Vec::new(),
                values: Vec::new(),
            }
        }
    };

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut carried = f64::NAN;
    let mut filled = 0usize;
    for date in first.iter_days().take_while(|d| *d <= last) {
        match buckets.get(&date) {
            Some(&(sum, count)) => carried = sum / count as f64,
            None => filled += 1,
        }
        dates.push(date);
        values.push(carried);
    }

    log::debug!(
        "Resampled {} to {} days ({} forward-filled)",
        series.asset,
        dates.len(),
        filled
    );

    DailySeries {
        asset: series.asset.clone(),
        dates,
        values,
    }
}

/// Restrict both daily series to their shared dates.
pub fn align(bitcoin: &DailySeries, gold: &DailySeries) -> Result<AlignedSeriesPair> {
    let mut dates = Vec::new();
    let mut bitcoin_values = Vec::new();
    let mut gold_values = Vec::new();

    // Both inputs are strictly increasing, so a merge walk finds the
    // intersection in order.
    let (mut i, mut j) = (0, 0);
    while i < bitcoin.len() && j < gold.len() {
        match bitcoin.dates[i].cmp(&gold.dates[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dates.push(bitcoin.dates[i]);
                bitcoin_values.push(bitcoin.values[i]);
                gold_values.push(gold.values[j]);
                i += 1;
                j += 1;
            }
        }
    }

    if dates.is_empty() {
        return Err(DataError::EmptyIntersection);
    }

    log::info!(
        "Aligned {} shared days from {} to {}",
        dates.len(),
        dates[0],
        dates[dates.len() - 1]
    );

    AlignedSeriesPair::new(dates, bitcoin_values, gold_values)
}

/// Resample both series and align them.
pub fn resample_and_align(bitcoin: &Series, gold: &Series) -> Result<AlignedSeriesPair> {
    align(&resample_daily(bitcoin), &resample_daily(gold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use approx::assert_relative_eq;

    fn at(d: u32, hour: u32, price: f64) -> PricePoint {
        PricePoint::new(
            NaiveDate::from_ymd_opt(2018, 1, d)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            price,
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
    }

    #[test]
    fn test_intraday_observations_are_averaged() {
        let series = Series::new(
            "bitcoin",
            vec![at(1, 0, 1.0), at(1, 6, 2.0), at(1, 12, 6.0), at(2, 0, 4.0)],
        );
        let daily = resample_daily(&series);

        assert_eq!(daily.dates, vec![day(1), day(2)]);
        assert_relative_eq!(daily.values[0], 3.0);
        assert_relative_eq!(daily.values[1], 4.0);
    }

    #[test]
    fn test_weekend_gap_is_forward_filled() {
        // 2018-01-05 is a Friday, 2018-01-08 a Monday.
        let series = Series::new("gold", vec![at(5, 0, 10.0), at(8, 0, 12.0)]);
        let daily = resample_daily(&series);

        assert_eq!(daily.dates, vec![day(5), day(6), day(7), day(8)]);
        assert_eq!(daily.values, vec![10.0, 10.0, 10.0, 12.0]);
    }

    #[test]
    fn test_resample_empty_series() {
        let daily = resample_daily(&Series::new("gold", Vec::new()));
        assert!(daily.is_empty());
    }

    #[test]
    fn test_alignment_intersects_dates() {
        let bitcoin = Series::new(
            "bitcoin",
            (1..=10).map(|d| at(d, 0, d as f64)).collect(),
        );
        let gold = Series::new(
            "gold",
            vec![at(3, 0, 30.0), at(5, 0, 50.0), at(12, 0, 120.0)],
        );

        let pair = resample_and_align(&bitcoin, &gold).expect("aligned");

        assert_eq!(pair.len(), 8);
        assert_eq!(pair.dates()[0], day(3));
        assert_eq!(pair.dates()[7], day(10));
        assert_eq!(pair.bitcoin().len(), pair.gold().len());
        // 2018-01-04 is filled from 2018-01-03.
        assert_eq!(pair.gold()[1], 30.0);
        assert_eq!(pair.bitcoin()[1], 4.0);
    }

    #[test]
    fn test_disjoint_series_fail() {
        let bitcoin = Series::new("bitcoin", vec![at(1, 0, 1.0), at(2, 0, 2.0)]);
        let gold = Series::new("gold", vec![at(5, 0, 1.0), at(6, 0, 2.0)]);

        assert!(matches!(
            resample_and_align(&bitcoin, &gold),
            Err(DataError::EmptyIntersection)
        ));
    }
}
