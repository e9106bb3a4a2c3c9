use crate::config::{Config, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Rolling regression slope of gold on bitcoin prices.
#[derive(Debug, Parser)]
#[command(name = "correlation-toolkit", version)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, default_value = "config/correlation.yaml")]
    pub config: PathBuf,

    /// Bitcoin price CSV (overrides the config file)
    #[arg(long)]
    pub bitcoin: Option<PathBuf>,

    /// Gold price CSV (overrides the config file)
    #[arg(long)]
    pub gold: Option<PathBuf>,

    /// Rolling window length in days
    #[arg(long)]
    pub window: Option<usize>,

    /// First day of the analysed range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the analysed range (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Chart output path (.svg or .png)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Load the config file and apply command line overrides on top.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.bitcoin {
            config.bitcoin.path = path.clone();
        }
        if let Some(path) = &self.gold {
            config.gold.path = path.clone();
        }
        if let Some(window) = self.window {
            config.analysis.window_size = window;
        }
        if let Some(start) = self.start {
            config.analysis.start_date = start;
        }
        if let Some(end) = self.end {
            config.analysis.end_date = end;
        }
        if let Some(output) = &self.output {
            config.chart.output = output.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "correlation-toolkit",
            "--gold",
            "gold.csv",
            "--window",
            "30",
            "--start",
            "2020-01-01",
            "--output",
            "chart.svg",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.gold.path, PathBuf::from("gold.csv"));
        assert_eq!(config.analysis.window_size, 30);
        assert_eq!(
            config.analysis.start_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(config.chart.output, PathBuf::from("chart.svg"));
        assert_eq!(config.bitcoin.path, Config::default().bitcoin.path);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::parse_from([
            "correlation-toolkit",
            "--config",
            "config/does_not_exist.yaml",
            "--window",
            "1",
        ]);
        assert!(cli.resolve_config().is_err());
    }
}
