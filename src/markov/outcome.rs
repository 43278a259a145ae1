//! Outcome and sequence representation

use crate::markov::streak::Streaks;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two mutually exclusive match results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    A,
    B,
}

impl Outcome {
    /// Both outcomes, in row/column order
    pub const ALL: [Outcome; 2] = [Outcome::A, Outcome::B];

    pub fn as_index(self) -> usize {
        match self {
            Outcome::A => 0,
            Outcome::B => 1,
        }
    }

    /// The opposite label
    pub fn other(self) -> Outcome {
        match self {
            Outcome::A => Outcome::B,
            Outcome::B => Outcome::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::A => "A",
            Outcome::B => "B",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chronologically ordered match outcomes
///
/// Insertion order is the order in which the matches were played. A sequence
/// may be empty; every analysis function accepts one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    outcomes: Vec<Outcome>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.outcomes.iter().copied()
    }

    /// Adjacent (previous, current) pairs in chronological order
    pub fn pairs(&self) -> impl Iterator<Item = (Outcome, Outcome)> + '_ {
        self.outcomes.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of occurrences of `outcome`
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|&&o| o == outcome).count()
    }

    /// Lazily decompose the sequence into maximal runs.
    ///
    /// Each call starts a fresh scan, so the decomposition can be restarted
    /// at will.
    pub fn streaks(&self) -> Streaks<'_> {
        Streaks::new(&self.outcomes)
    }
}

impl From<Vec<Outcome>> for Sequence {
    fn from(outcomes: Vec<Outcome>) -> Self {
        Self { outcomes }
    }
}

impl FromIterator<Outcome> for Sequence {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for outcome in &self.outcomes {
            write!(f, "{}", outcome)?;
        }
        Ok(())
    }
}
