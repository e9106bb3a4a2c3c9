use crate::data::{DataError, PricePoint, Result, Series};
use chrono::NaiveDate;

/// Sort, restrict to the inclusive `[start, end]` calendar range and z-score
/// the prices over the retained rows.
pub fn normalize(series: Series, start: NaiveDate, end: NaiveDate) -> Result<Series> {
    let Series { asset, mut points } = series;

    // Stable, so same-timestamp rows keep file order.
    points.sort_by_key(|p| p.timestamp);
    points.retain(|p| (start..=end).contains(&p.date()));

    if points.is_empty() {
        return Err(DataError::EmptyRange { asset, start, end });
    }
    log::info!(
        "Kept {} {} rows between {} and {}",
        points.len(),
        asset,
        start,
        end
    );

    standardize(Series::new(asset, points))
}

/// Zero mean, unit sample standard deviation.
pub fn standardize(series: Series) -> Result<Series> {
    if series.len() < 2 {
        return Err(DataError::InsufficientData {
            asset: series.asset,
            reason: "at least two observations are needed to standardize".to_string(),
        });
    }

    let prices = series.prices();
    let mean = prices.mean().ok_or_else(|| DataError::InsufficientData {
        asset: series.asset.clone(),
        reason: "no observations".to_string(),
    })?;
    let std = prices.std(1.0);

    if std == 0.0 || !std.is_finite() {
        let start = series.points[0].date();
        let end = series.points[series.len() - 1].date();
        return Err(DataError::ZeroVariance {
            asset: series.asset,
            start,
            end,
        });
    }

    log::debug!("{} mean {:.4}, std {:.4}", series.asset, mean, std);

    let points = series
        .points
        .iter()
        .map(|p| PricePoint::new(p.timestamp, (p.price - mean) / std))
        .collect();

    Ok(Series::new(series.asset, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn point(y: i32, m: u32, d: u32, price: f64) -> PricePoint {
        PricePoint::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price,
        )
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        )
    }

    #[test]
    fn test_standardized_mean_and_std() {
        let series = Series::new(
            "gold",
            vec![
                point(2018, 1, 3, 1314.6),
                point(2018, 1, 2, 1316.2),
                point(2018, 1, 4, 1321.0),
                point(2018, 1, 5, 1320.3),
                point(2018, 1, 8, 1318.9),
            ],
        );
        let (start, end) = range();
        let result = normalize(series, start, end).expect("normalize");

        let prices = result.prices();
        assert_abs_diff_eq!(prices.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(prices.std(1.0), 1.0, epsilon = 1e-12);

        // Sorted ascending.
        assert!(result
            .points
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let mut late = point(2023, 6, 30, 4.0);
        late.timestamp = late.date().and_hms_opt(23, 59, 0).unwrap();
        let series = Series::new(
            "bitcoin",
            vec![
                point(2017, 12, 31, 100.0),
                point(2018, 1, 1, 1.0),
                point(2020, 5, 5, 2.0),
                late,
                point(2023, 7, 1, 100.0),
            ],
        );
        let (start, end) = range();
        let result = normalize(series, start, end).expect("normalize");

        assert_eq!(result.len(), 3);
        assert_eq!(result.points[0].date(), start);
        assert_eq!(result.points[2].date(), end);
    }

    #[test]
    fn test_empty_range() {
        let series = Series::new("gold", vec![point(2017, 6, 1, 1.0), point(2017, 6, 2, 2.0)]);
        let (start, end) = range();
        match normalize(series, start, end) {
            Err(DataError::EmptyRange { asset, .. }) => assert_eq!(asset, "gold"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_constant_prices_rejected() {
        let series = Series::new(
            "bitcoin",
            vec![point(2019, 1, 1, 5.0), point(2019, 1, 2, 5.0)],
        );
        assert!(matches!(
            standardize(series),
            Err(DataError::ZeroVariance { .. })
        ));
    }

    #[test]
    fn test_single_observation_rejected() {
        let series = Series::new("bitcoin", vec![point(2019, 1, 1, 5.0)]);
        assert!(matches!(
            standardize(series),
            Err(DataError::InsufficientData { .. })
        ));
    }
}
