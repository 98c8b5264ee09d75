//! Run configuration.
//!
//! Loaded from a TOML file, then overridden by `MOCKFIN_*` environment
//! variables and finally by command-line flags. Validation gathers every
//! violation before failing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use mockfin_core::types::DateRange;
use mockfin_generators::lifecycle::{DEFAULT_DEPARTURE_RATE, DEFAULT_JOIN_AFTER_START_RATE};

/// Accepted log levels.
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// First simulated date
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Last simulated date, inclusive
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    /// Number of assets to generate
    #[serde(default = "default_asset_count")]
    pub asset_count: u64,

    /// Number of users to generate
    #[serde(default = "default_user_count")]
    pub user_count: u64,

    /// Directory receiving run directories
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run seed; drawn from entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Share of users joining after the start date
    #[serde(default = "default_join_after_start_rate")]
    pub join_after_start_rate: f64,

    /// Share of users departing before the end date
    #[serde(default = "default_departure_rate")]
    pub departure_rate: f64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default()
}

fn default_asset_count() -> u64 {
    50
}

fn default_user_count() -> u64 {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_join_after_start_rate() -> f64 {
    DEFAULT_JOIN_AFTER_START_RATE
}

fn default_departure_rate() -> f64 {
    DEFAULT_DEPARTURE_RATE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            asset_count: default_asset_count(),
            user_count: default_user_count(),
            output_dir: default_output_dir(),
            seed: None,
            join_after_start_rate: default_join_after_start_rate(),
            departure_rate: default_departure_rate(),
            log_level: default_log_level(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Parse(format!("{}='{}': {}", key, raw, e)))
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from `path` when given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply `MOCKFIN_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("MOCKFIN_START_DATE") {
            self.start_date = parse_var("MOCKFIN_START_DATE", &raw)?;
        }
        if let Some(raw) = lookup("MOCKFIN_END_DATE") {
            self.end_date = parse_var("MOCKFIN_END_DATE", &raw)?;
        }
        if let Some(raw) = lookup("MOCKFIN_ASSET_COUNT") {
            self.asset_count = parse_var("MOCKFIN_ASSET_COUNT", &raw)?;
        }
        if let Some(raw) = lookup("MOCKFIN_USER_COUNT") {
            self.user_count = parse_var("MOCKFIN_USER_COUNT", &raw)?;
        }
        if let Some(raw) = lookup("MOCKFIN_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("MOCKFIN_SEED") {
            self.seed = Some(parse_var("MOCKFIN_SEED", &raw)?);
        }
        if let Some(raw) = lookup("MOCKFIN_LOG_LEVEL") {
            self.log_level = raw;
        }
        Ok(self)
    }

    /// Simulation window
    pub fn window(&self) -> Result<DateRange, ConfigError> {
        DateRange::new(self.start_date, self.end_date)
            .map_err(|e| ConfigError::Validation(vec![e.to_string()]))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = DateRange::new(self.start_date, self.end_date) {
            errors.push(e.to_string());
        }

        if self.asset_count == 0 {
            errors.push("asset_count must be greater than 0".to_string());
        }
        if self.user_count == 0 {
            errors.push("user_count must be greater than 0".to_string());
        }

        for (name, rate) in [
            ("join_after_start_rate", self.join_after_start_rate),
            ("departure_rate", self.departure_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                errors.push(format!("{} {} must be within [0, 1]", name, rate));
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            errors.push("output_dir cannot be empty".to_string());
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file with environment overrides and validate
    pub fn load_with_env_and_validate(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override()?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration error type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file or override
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation errors
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_validates() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.asset_count, 50);
        assert_eq!(config.user_count, 100);
        assert_eq!(config.window().unwrap().num_days(), 366);
    }

    #[test]
    fn test_validation_collects_every_error() {
        let config = PipelineConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            asset_count: 0,
            user_count: 0,
            departure_rate: 1.5,
            log_level: "loud".to_string(),
            ..PipelineConfig::default()
        };
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 5);
                assert!(errors.iter().any(|e| e.contains("before start")));
                assert!(errors.iter().any(|e| e.contains("asset_count")));
                assert!(errors.iter().any(|e| e.contains("departure_rate")));
                assert!(errors.iter().any(|e| e.contains("log_level")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_day_window_is_valid() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let config = PipelineConfig {
            start_date: day,
            end_date: day,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let config = PipelineConfig::default()
            .with_overrides_from(lookup(&[
                ("MOCKFIN_START_DATE", "2023-01-01"),
                ("MOCKFIN_ASSET_COUNT", "7"),
                ("MOCKFIN_SEED", "42"),
                ("MOCKFIN_OUTPUT_DIR", "/tmp/mockfin"),
            ]))
            .unwrap();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(config.asset_count, 7);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/mockfin"));
        assert_eq!(config.user_count, 100);
    }

    #[test]
    fn test_malformed_override_rejected() {
        let err = PipelineConfig::default()
            .with_overrides_from(lookup(&[("MOCKFIN_USER_COUNT", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("MOCKFIN_USER_COUNT")));
    }

    #[test]
    fn test_load_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mockfin.toml");
        std::fs::write(
            &path,
            "start_date = \"2022-01-01\"\nend_date = \"2022-03-31\"\nuser_count = 5\nseed = 9\n",
        )
        .unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.user_count, 5);
        assert_eq!(config.asset_count, 50);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.window().unwrap().num_days(), 90);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load(Path::new("/nonexistent/mockfin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
