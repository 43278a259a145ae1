//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use crate::input::RESULT_FIELD;
use crate::markov::AnalysisOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when no feed URL is configured
pub const FEED_URL_ENV: &str = "MATCH_FEED_URL";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisOptions,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Live feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Endpoint returning the latest result
    pub url: Option<String>,

    /// JSON field holding the result
    #[serde(default = "default_result_field")]
    pub result_field: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_result_field() -> String {
    RESULT_FIELD.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            result_field: default_result_field(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
            file: path.clone(),
            message: e.to_string(),
        })?;

        if config.feed.timeout_secs == 0 {
            return Err(Error::Config(format!(
                "feed.timeout_secs in {:?} must be at least 1",
                path
            )));
        }

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.match-markov/config.toml
    /// 3. /etc/match-markov/config.toml
    pub fn load() -> Result<Self> {
        let paths = vec![
            PathBuf::from("config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".match-markov").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/dev/null")),
            PathBuf::from("/etc/match-markov/config.toml"),
        ];

        for path in paths {
            if path.is_file() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Get the feed URL from config or environment
    pub fn feed_url(&self) -> Result<String> {
        if let Some(url) = &self.feed.url {
            return Ok(url.clone());
        }

        std::env::var(FEED_URL_ENV).map_err(|_| {
            Error::MissingConfig(format!(
                "Feed URL not found. Pass --url, set {} or configure [feed] url in the config file",
                FEED_URL_ENV
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::{EstimationPolicy, TieBreak};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.policy, EstimationPolicy::MaximumLikelihood);
        assert_eq!(config.analysis.tie_break, TieBreak::PreferA);
        assert_eq!(config.feed.result_field, "result");
        assert_eq!(config.feed.timeout(), Duration::from_secs(10));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[analysis]
policy = "laplace"
tie_break = "repeat"

[feed]
url = "http://localhost:8080/latest"
result_field = "winner"
max_retries = 5

[logging]
level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.analysis.policy, EstimationPolicy::Laplace);
        assert_eq!(config.analysis.tie_break, TieBreak::Repeat);
        assert_eq!(config.feed_url().unwrap(), "http://localhost:8080/latest");
        assert_eq!(config.feed.result_field, "winner");
        assert_eq!(config.feed.max_retries, 5);
        assert_eq!(config.feed.retry_delay_ms, 1000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\ntimeout_secs = 3").unwrap();
        file.flush().unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.feed.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_from_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[feed]\ntimeout_secs = 0").unwrap();
        file.flush().unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(Error::Config(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\npolicy = \"bayesian\"").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(Error::ConfigParse { .. })
        ));
    }
}
