//! Line chart of the rolling slope series.

use crate::analysis::rolling::CorrelationSeries;
use crate::config::ChartSettings;
use chrono::NaiveDate;
use ndarray_stats::QuantileExt;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

pub const CHART_TITLE: &str = "Daily Correlation Strength between Bitcoin and Gold Prices";

// Below this many days, month-only tick labels repeat.
const DAY_LABEL_SPAN_DAYS: i64 = 90;

// Dark theme palette.
const BACKGROUND: RGBColor = RGBColor(17, 17, 17);
const GRID: RGBColor = RGBColor(40, 52, 66);
const TEXT: RGBColor = RGBColor(242, 245, 250);
const LINE: RGBColor = RGBColor(99, 110, 250);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Svg,
    Png,
}

impl ChartFormat {
    /// `.svg` selects SVG output, anything else a PNG bitmap.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartFormat::Svg,
            _ => ChartFormat::Png,
        }
    }
}

/// Draw `series` to `settings.output`.
///
/// An empty series still produces a chart with axes and title.
pub fn render_correlation_chart(
    series: &CorrelationSeries,
    settings: &ChartSettings,
) -> Result<(), RenderError> {
    let path = settings.output.as_path();
    let size = (settings.width, settings.height);

    match ChartFormat::from_path(path) {
        ChartFormat::Svg => {
            draw_chart(SVGBackend::new(path, size).into_drawing_area(), series)
                .map_err(backend_error)?
        }
        ChartFormat::Png => {
            draw_chart(BitMapBackend::new(path, size).into_drawing_area(), series)
                .map_err(backend_error)?
        }
    }

    log::info!("Chart written to {}", path.display());
    Ok(())
}

fn backend_error<E: Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &CorrelationSeries,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&BACKGROUND)?;

    let (x_range, y_range) = axis_ranges(series);
    let label_format = date_label_format(&x_range);
    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 28).into_font().color(&TEXT))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Correlation Strength")
        .x_labels(10)
        .x_label_formatter(&|date: &NaiveDate| date.format(label_format).to_string())
        .axis_style(&GRID)
        .bold_line_style(&GRID)
        .light_line_style(&BACKGROUND)
        .label_style(("sans-serif", 14).into_font().color(&TEXT))
        .axis_desc_style(("sans-serif", 16).into_font().color(&TEXT))
        .draw()?;

    if !series.is_empty() {
        chart
            .draw_series(LineSeries::new(
                series.points().iter().map(|p| (p.date, p.slope)),
                LINE.stroke_width(2),
            ))?
            .label("Correlation Strength")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(BACKGROUND.mix(0.8))
            .border_style(&GRID)
            .label_font(("sans-serif", 14).into_font().color(&TEXT))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Tick label layout for the date axis.
pub fn date_label_format(range: &Range<NaiveDate>) -> &'static str {
    if (range.end - range.start).num_days() < DAY_LABEL_SPAN_DAYS {
        "%Y-%m-%d"
    } else {
        "%Y-%m"
    }
}

/// Axis ranges covering every point, widened so neither range is empty.
pub fn axis_ranges(series: &CorrelationSeries) -> (Range<NaiveDate>, Range<f64>) {
    let points = series.points();
    let first = match points.first() {
        Some(point) => point.date,
        None => NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN),
    };
    let last = points.last().map_or(first, |point| point.date);
    let last = if last > first {
        last
    } else {
        first.succ_opt().unwrap_or(first)
    };

    let slopes = series.slopes();
    let y_range = match (slopes.min(), slopes.max()) {
        (Ok(&min), Ok(&max)) if max > min => {
            let pad = (max - min) * 0.05;
            (min - pad)..(max + pad)
        }
        (Ok(&value), Ok(_)) => (value - 1.0)..(value + 1.0),
        _ => -1.0..1.0,
    };

    (first..last, y_range)
}
