//! Configuration management for docunlock
//!
//! Settings come from a TOML file passed with `--config`, or from the
//! defaults when no file is given.

use crate::error::{Result, SearchError};
use crate::search::config::{
    INCREMENTAL_LENGTH_CAP, INCREMENTAL_MAX_LENGTH, INCREMENTAL_MIN_LENGTH, LengthRange,
};
use crate::search::parallel::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Search engine configuration
    pub search: SearchSection,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Search engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Shortest string tried by the incremental strategy
    pub incremental_min_length: usize,

    /// Longest string tried by the incremental strategy
    pub incremental_max_length: usize,

    /// Publish a progress event every N attempts
    pub progress_interval: u64,

    /// Capacity of the progress event channel
    pub event_capacity: usize,

    /// Fixed seed for the random strategy
    pub seed: Option<u64>,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            incremental_min_length: INCREMENTAL_MIN_LENGTH,
            incremental_max_length: INCREMENTAL_MAX_LENGTH,
            progress_interval: 1000,
            event_capacity: 1024,
            seed: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        Self::from_toml(&content)
            .map_err(|e| SearchError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.progress_interval == 0 {
            return Err(SearchError::Config(
                "progress_interval must be greater than 0".to_string(),
            ));
        }

        if search.event_capacity == 0 {
            return Err(SearchError::Config(
                "event_capacity must be greater than 0".to_string(),
            ));
        }

        if search.incremental_max_length > INCREMENTAL_LENGTH_CAP {
            return Err(SearchError::Config(format!(
                "incremental_max_length must be at most {INCREMENTAL_LENGTH_CAP}"
            )));
        }

        self.incremental_lengths()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(SearchError::Config(format!(
                "unknown log format: {other} (expected text or json)"
            ))),
        }
    }

    /// Incremental length bounds as a validated range
    pub fn incremental_lengths(&self) -> Result<LengthRange> {
        LengthRange::new(
            self.search.incremental_min_length,
            self.search.incremental_max_length,
        )
    }

    /// Build the coordinator configuration from the search section
    pub fn coordinator_config(&self) -> Result<CoordinatorConfig> {
        Ok(CoordinatorConfig::default()
            .with_progress_interval(self.search.progress_interval)
            .with_event_capacity(self.search.event_capacity)
            .with_incremental_lengths(self.incremental_lengths()?)
            .with_seed_option(self.search.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.incremental_max_length, 8);
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_zero_progress_interval_rejected() {
        let mut config = Config::default();
        config.search.progress_interval = 0;
        assert!(matches!(config.validate(), Err(SearchError::Config(_))));
    }

    #[test]
    fn test_length_bounds_rejected() {
        let mut config = Config::default();
        config.search.incremental_max_length = 17;
        assert!(config.validate().is_err());

        config.search.incremental_max_length = 4;
        config.search.incremental_min_length = 0;
        assert!(config.validate().is_err());

        config.search.incremental_min_length = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [search]
            incremental_max_length = 4
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.search.incremental_min_length, 1);
        assert_eq!(config.search.incremental_max_length, 4);
        assert_eq!(config.search.seed, Some(7));
        assert_eq!(config.logging.level, "info");

        let coordinator = config.coordinator_config().unwrap();
        assert_eq!(coordinator.incremental_lengths, LengthRange { min: 1, max: 4 });
        assert_eq!(coordinator.seed, Some(7));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file(Path::new("/no/such/docunlock.toml")).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
