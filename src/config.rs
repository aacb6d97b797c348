//! Configuration handling for the trafoscript runner
//!
//! Manages the optional trafoscript.toml file found next to a script.
//!
//! ## Environment Variables
//!
//! The following environment variables override config file settings:
//!
//! - `TRAFOSCRIPT_FIRST_DAY_OF_WEEK` - First day of week-aligned bins (e.g. `sunday`)
//! - `TRAFOSCRIPT_START_OF_DAY` - Time of day at which daily bins start (`HH:MM`)
//!
//! These can be set in a `.env` file in the script directory.

use anyhow::Context as _;
use chrono::{DateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::path::Path;
use trafoscript_core::{AggregationPreferences, EvaluationOptions};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "trafoscript.toml";

/// Environment variable names
pub const ENV_FIRST_DAY_OF_WEEK: &str = "TRAFOSCRIPT_FIRST_DAY_OF_WEEK";
pub const ENV_START_OF_DAY: &str = "TRAFOSCRIPT_START_OF_DAY";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Calendar layout of fixed bins
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

/// Aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Day on which weekly bins start
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: String,
    /// Offset of the start of each day, as `HH:MM`
    #[serde(default = "default_start_of_day")]
    pub start_of_day: String,
    /// Produce fixed bins at least up to this RFC 3339 time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

fn default_first_day_of_week() -> String {
    "monday".to_string()
}

fn default_start_of_day() -> String {
    "00:00".to_string()
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            first_day_of_week: default_first_day_of_week(),
            start_of_day: default_start_of_day(),
            end_time: None,
        }
    }
}

impl Config {
    /// Load configuration from a directory
    ///
    /// This also loads any `.env` file in the directory and applies
    /// environment variable overrides. A missing config file yields the
    /// defaults.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        Self::load_with_env(dir, ".env")
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        load_env_file(&dir.join(".env"));

        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration with a specific env file
    fn load_with_env(dir: &Path, env_file: &str) -> anyhow::Result<Self> {
        load_env_file(&dir.join(env_file));

        let config_path = dir.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Self::default()
        };

        // Apply environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides looked up by variable name; empty values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(day) = lookup(ENV_FIRST_DAY_OF_WEEK).filter(|v| !v.is_empty()) {
            self.aggregation.first_day_of_week = day;
        }

        if let Some(start) = lookup(ENV_START_OF_DAY).filter(|v| !v.is_empty()) {
            self.aggregation.start_of_day = start;
        }
    }

    /// Resolve the textual settings into evaluation options
    pub fn evaluation_options(&self) -> anyhow::Result<EvaluationOptions> {
        let aggregation = &self.aggregation;

        let first_day_of_week: Weekday = aggregation
            .first_day_of_week
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid first_day_of_week '{}'", aggregation.first_day_of_week))?;

        let start_of_day = NaiveTime::parse_from_str(&aggregation.start_of_day, "%H:%M")
            .with_context(|| format!("Invalid start_of_day '{}', expected HH:MM", aggregation.start_of_day))?
            .signed_duration_since(NaiveTime::MIN);

        let end_time = aggregation
            .end_time
            .as_deref()
            .map(|s| {
                DateTime::parse_from_rfc3339(s)
                    .with_context(|| format!("Invalid end_time '{}', expected RFC 3339", s))
            })
            .transpose()?;

        Ok(EvaluationOptions {
            preferences: AggregationPreferences {
                first_day_of_week,
                start_of_day,
            },
            end_time,
        })
    }
}

/// Load an env file if present (ignore errors)
fn load_env_file(path: &Path) {
    if path.exists() {
        let _ = dotenvy::from_path(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    #[test]
    fn test_defaults() {
        let options = Config::default().evaluation_options().unwrap();
        assert_eq!(options, EvaluationOptions::default());
    }

    #[test]
    fn test_parse_aggregation_section() {
        let config: Config = toml::from_str(
            r#"
            [aggregation]
            first_day_of_week = "sunday"
            start_of_day = "04:30"
            end_time = "2024-03-01T00:00:00+01:00"
            "#,
        )
        .unwrap();

        let options = config.evaluation_options().unwrap();
        assert_eq!(options.preferences.first_day_of_week, Weekday::Sun);
        assert_eq!(
            options.preferences.start_of_day,
            Duration::hours(4) + Duration::minutes(30)
        );
        assert_eq!(
            options.end_time,
            Some(
                FixedOffset::east_opt(3600)
                    .unwrap()
                    .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("[aggregation]\nstart_of_day = \"06:00\"\n").unwrap();
        assert_eq!(config.aggregation.first_day_of_week, "monday");
        assert_eq!(config.aggregation.end_time, None);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|name| match name {
            ENV_FIRST_DAY_OF_WEEK => Some("Sat".to_string()),
            ENV_START_OF_DAY => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.aggregation.first_day_of_week, "Sat");
        assert_eq!(config.aggregation.start_of_day, "00:00");

        let options = config.evaluation_options().unwrap();
        assert_eq!(options.preferences.first_day_of_week, Weekday::Sat);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut config = Config::default();
        config.aggregation.first_day_of_week = "someday".to_string();
        assert!(config.evaluation_options().is_err());

        let mut config = Config::default();
        config.aggregation.start_of_day = "25:00".to_string();
        let err = config.evaluation_options().unwrap_err();
        assert!(err.to_string().contains("start_of_day"));

        let mut config = Config::default();
        config.aggregation.end_time = Some("yesterday".to_string());
        assert!(config.evaluation_options().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[aggregation]"));
        assert!(toml_str.contains("first_day_of_week = \"monday\""));
        assert!(!toml_str.contains("end_time"));
    }
}
