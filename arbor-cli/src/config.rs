//! Viewer configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Settings read from `config.json` in the config directory.
///
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Simulated latency of the sample provider.
    pub latency_ms: u64,
    /// Deepest level rendered from level configuration.
    pub max_depth: Option<usize>,
    /// How long fetched children are cached; 0 disables the cache.
    pub cache_ttl_secs: u64,
    /// Log level name (`off`, `error`, ... `trace`).
    pub log_level: String,
    /// JSON file to browse instead of the sample data.
    pub data_file: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            latency_ms: 300,
            max_depth: None,
            cache_ttl_secs: 300,
            log_level: "debug".to_string(),
            data_file: None,
        }
    }
}

impl ViewerConfig {
    /// Load the config at `path`, falling back to defaults if it is missing.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) if path.exists() => Self::from_json(&std::fs::read_to_string(path)?),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a config document.
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, CliError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| CliError::LogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{ "latency_ms": 0, "max_depth": 2 }"#).unwrap();
        assert_eq!(config.latency(), Duration::ZERO);
        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.data_file, None);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = ViewerConfig::load(Some(Path::new("/definitely/not/here.json"))).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(ViewerConfig::load(None).unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_level_filter() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);

        config.log_level = "loud".to_string();
        assert!(matches!(config.level_filter(), Err(CliError::LogLevel(_))));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            ViewerConfig::from_json("[1, 2]"),
            Err(CliError::Config(_))
        ));
    }
}
