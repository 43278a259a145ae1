//! Feed module - Abstraction for fetching the latest match result
//!
//! This module provides a trait-based abstraction over the external result
//! feed (HTTP endpoint or scripted mock data) and the live sequence that
//! accumulates fetched results.

use crate::{Config, Error, Result};
use async_trait::async_trait;
use clap::ValueEnum;

pub mod http;
pub mod live;
pub mod mock;

pub use live::{LiveSequence, PollOutcome, poll_once};

/// Source of the most recent match result
///
/// Implementations:
/// - `HttpFeed`: GET against a JSON endpoint
/// - `MockFeed`: scripted responses for tests and offline runs
#[async_trait]
pub trait ResultFeed: Send + Sync {
    /// Fetch the raw, not yet normalized, result label
    async fn fetch_result(&self) -> Result<String>;
}

/// Feed backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedSource {
    /// HTTP endpoint
    Http,
    /// Scripted results
    Mock,
}

/// Create a feed instance based on type and configuration
pub fn create_feed(
    source: FeedSource,
    config: &Config,
    mock_results: &[String],
) -> Result<Box<dyn ResultFeed>> {
    match source {
        FeedSource::Http => {
            let feed = http::HttpFeed::new(config.feed_url()?, config.feed.timeout())?
                .with_field(config.feed.result_field.clone())
                .with_max_retries(config.feed.max_retries)
                .with_retry_delay(config.feed.retry_delay());
            Ok(Box::new(feed))
        }
        FeedSource::Mock => {
            if mock_results.is_empty() {
                return Err(Error::MissingConfig(
                    "Mock feed needs at least one scripted result (--mock-results)".to_string(),
                ));
            }
            Ok(Box::new(mock::MockFeed::from_labels(mock_results)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_mock_feed() {
        let feed = create_feed(FeedSource::Mock, &Config::default(), &["A".to_string()]).unwrap();
        assert_eq!(feed.fetch_result().await.unwrap(), "A");
    }

    #[test]
    fn test_mock_feed_requires_results() {
        let result = create_feed(FeedSource::Mock, &Config::default(), &[]);
        assert!(matches!(result, Err(Error::MissingConfig(_))));
    }
}
