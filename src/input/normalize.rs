//! Label normalization
//!
//! Raw result labels come in several spellings ("A", "b", "Player A",
//! "Team B"). They are mapped onto [`Outcome`] before any filtering happens.

use crate::markov::Outcome;
use regex::Regex;
use std::sync::LazyLock;

static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:player|team|side)\s+)?([ab])\s*$").expect("label pattern is valid")
});

/// Map a raw label onto an outcome, or `None` if it is not A/B
pub fn normalize_label(raw: &str) -> Option<Outcome> {
    let captures = LABEL_PATTERN.captures(raw)?;
    match captures.get(1)?.as_str() {
        "A" | "a" => Some(Outcome::A),
        "B" | "b" => Some(Outcome::B),
        _ => None,
    }
}
