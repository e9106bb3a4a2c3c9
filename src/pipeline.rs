use crate::analysis::alignment::resample_and_align;
use crate::analysis::rolling::{CorrelationSeries, RollingRegression};
use crate::analysis::standardize::normalize;
use crate::config::{Config, SourceConfig};
use crate::data::loader::DataLoader;
use crate::data::{AlignedSeriesPair, Series};
use anyhow::{Context, Result};

pub const BITCOIN: &str = "bitcoin";
pub const GOLD: &str = "gold";

/// Load, normalize, align and estimate, without rendering.
pub fn compute_correlation_series(config: &Config) -> Result<CorrelationSeries> {
    let pair = load_aligned_pair(config)?;
    let regression = RollingRegression::new(config.analysis.window_size)?;
    let series = regression.estimate(&pair).with_context(|| {
        format!(
            "estimating rolling regression over {}-day windows",
            regression.window_size()
        )
    })?;
    Ok(series)
}

/// Both sources standardized over the configured range and aligned by day.
pub fn load_aligned_pair(config: &Config) -> Result<AlignedSeriesPair> {
    let bitcoin = load_normalized(&config.bitcoin, BITCOIN, config)?;
    let gold = load_normalized(&config.gold, GOLD, config)?;

    let pair = resample_and_align(&bitcoin, &gold).context("aligning bitcoin and gold")?;
    Ok(pair)
}

fn load_normalized(source: &SourceConfig, asset: &str, config: &Config) -> Result<Series> {
    let raw = DataLoader::load_prices(
        &source.path,
        asset,
        &source.date_column,
        &source.price_column,
    )
    .with_context(|| format!("loading {} prices from {}", asset, source.path.display()))?;

    let series = normalize(raw, config.analysis.start_date, config.analysis.end_date)
        .with_context(|| format!("normalizing {} prices", asset))?;
    Ok(series)
}
