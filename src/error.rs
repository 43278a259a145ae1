//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source data could not be parsed at all
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A required field is absent from the input records
    #[error("Missing column: input must contain a '{0}' field")]
    MissingColumn(String),

    /// Every record was filtered out
    #[error("No valid match results ('A' or 'B') were found")]
    NoValidData,

    /// Network, status or payload error from the live feed
    #[error("Feed fetch failed: {0}")]
    FetchFailure(String),

    /// The feed answered, but with a value that is not A or B
    #[error("Feed returned an unrecognized result: {0:?}")]
    InvalidLabel(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file parsing errors
    #[error("Config parsing error in {file:?}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Missing configuration
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a malformed input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Create a feed fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchFailure(msg.into())
    }
}

// Implement From traits for common external error types

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput(format!("JSON error: {}", err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::MalformedInput(format!("CSV error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::fetch("connection refused");
        assert_eq!(err.to_string(), "Feed fetch failed: connection refused");

        let err = Error::MissingColumn("result".to_string());
        assert_eq!(
            err.to_string(),
            "Missing column: input must contain a 'result' field"
        );
    }

    #[test]
    fn test_feed_errors_are_distinct() {
        let failure = Error::fetch("timeout");
        let invalid = Error::InvalidLabel("draw".to_string());
        assert!(matches!(failure, Error::FetchFailure(_)));
        assert_eq!(
            invalid.to_string(),
            "Feed returned an unrecognized result: \"draw\""
        );
    }

    #[test]
    fn test_json_error_is_malformed_input() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
