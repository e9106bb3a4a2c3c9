use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where one asset's prices live and which columns hold them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub date_column: String,
    pub price_column: String,
}

impl SourceConfig {
    pub fn bitcoin() -> Self {
        Self {
            path: PathBuf::from("data/bitcoin_2017_to_2023.csv"),
            date_column: "timestamp".to_string(),
            price_column: "close".to_string(),
        }
    }

    pub fn gold() -> Self {
        Self {
            path: PathBuf::from("data/goldstock.csv"),
            date_column: "Date".to_string(),
            price_column: "Close".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window_size: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap_or(NaiveDate::MAX),
            window_size: 360,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("correlation_strength.png"),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "SourceConfig::bitcoin")]
    pub bitcoin: SourceConfig,
    #[serde(default = "SourceConfig::gold")]
    pub gold: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bitcoin: SourceConfig::bitcoin(),
            gold: SourceConfig::gold(),
            analysis: AnalysisSettings::default(),
            chart: ChartSettings::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "No config at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        if analysis.start_date > analysis.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is after end_date {}",
                analysis.start_date, analysis.end_date
            )));
        }
        if analysis.window_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "window_size must be at least 2, got {}",
                analysis.window_size
            )));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "chart size must be positive, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.window_size, 360);
        assert_eq!(config.bitcoin.date_column, "timestamp");
        assert_eq!(config.gold.price_column, "Close");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
gold:
  path: /tmp/gold.csv
  date_column: Date
  price_column: Close
analysis:
  window_size: 30
"#;
        let config = Config::from_yaml(yaml).expect("valid yaml");

        assert_eq!(config.gold.path, PathBuf::from("/tmp/gold.csv"));
        assert_eq!(config.bitcoin, SourceConfig::bitcoin());
        assert_eq!(config.analysis.window_size, 30);
        assert_eq!(
            config.analysis.start_date,
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
        );
        assert_eq!(config.chart, ChartSettings::default());
    }

    #[test]
    fn test_dates_parse_from_yaml() {
        let yaml = "analysis:\n  start_date: 2019-02-01\n  end_date: 2020-02-01\n";
        let config = Config::from_yaml(yaml).expect("valid yaml");
        assert_eq!(
            config.analysis.end_date,
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let reversed = "analysis:\n  start_date: 2021-01-01\n  end_date: 2020-01-01\n";
        assert!(matches!(
            Config::from_yaml(reversed),
            Err(ConfigError::Invalid(_))
        ));

        let tiny_window = "analysis:\n  window_size: 1\n";
        assert!(matches!(
            Config::from_yaml(tiny_window),
            Err(ConfigError::Invalid(_))
        ));

        let flat_chart = "chart:\n  height: 0\n";
        assert!(matches!(
            Config::from_yaml(flat_chart),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("config/does_not_exist.yaml").expect("defaults");
        assert_eq!(config, Config::default());
    }
}
