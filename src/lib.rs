//! Match Outcome Predictor
//!
//! Estimates a first-order Markov model over a sequence of binary match
//! outcomes (A or B) and predicts the next one.
//!
//! This library provides functionality for:
//! - Loading match results from CSV or JSON files, normalizing their labels
//! - Estimating transition probabilities and predicting the next outcome
//! - Decomposing the sequence into streaks and counting alternations
//! - Polling a live result feed into an owned, growing sequence

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod input;
pub mod markov;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "match-markov");
    }
}
