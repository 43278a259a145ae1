//! Streak (maximal run) decomposition and pattern statistics

use crate::markov::{Outcome, Sequence};
use serde::Serialize;
use std::collections::BTreeMap;

/// A maximal run of identical consecutive outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub outcome: Outcome,
    pub length: usize,
}

impl Streak {
    pub fn new(outcome: Outcome, length: usize) -> Self {
        Self { outcome, length }
    }
}

/// Lazy single-pass iterator over the streaks of a sequence
///
/// Created by [`Sequence::streaks`]. A clone continues from the same
/// position; call [`Sequence::streaks`] again to start over.
#[derive(Debug, Clone)]
pub struct Streaks<'a> {
    outcomes: &'a [Outcome],
    pos: usize,
}

impl<'a> Streaks<'a> {
    pub(crate) fn new(outcomes: &'a [Outcome]) -> Self {
        Self { outcomes, pos: 0 }
    }
}

impl Iterator for Streaks<'_> {
    type Item = Streak;

    fn next(&mut self) -> Option<Streak> {
        let outcome = *self.outcomes.get(self.pos)?;
        let length = self.outcomes[self.pos..]
            .iter()
            .take_while(|&&o| o == outcome)
            .count();
        self.pos += length;
        Some(Streak { outcome, length })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.outcomes.len() - self.pos;
        (remaining.min(1), Some(remaining))
    }
}

impl std::iter::FusedIterator for Streaks<'_> {}

/// Longest run of `outcome`, or 0 if it never occurs
pub fn longest_streak(sequence: &Sequence, outcome: Outcome) -> usize {
    sequence
        .streaks()
        .filter(|s| s.outcome == outcome)
        .map(|s| s.length)
        .max()
        .unwrap_or(0)
}

/// Number of adjacent positions where the outcome changes
pub fn alternations(sequence: &Sequence) -> usize {
    sequence.pairs().filter(|(prev, curr)| prev != curr).count()
}

/// Frequency of streak lengths, per outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakHistogram {
    #[serde(rename = "A")]
    a: BTreeMap<usize, usize>,
    #[serde(rename = "B")]
    b: BTreeMap<usize, usize>,
}

impl StreakHistogram {
    pub fn from_streaks(streaks: impl IntoIterator<Item = Streak>) -> Self {
        let mut histogram = Self::default();
        for streak in streaks {
            *histogram.lengths_mut(streak.outcome).entry(streak.length).or_insert(0) += 1;
        }
        histogram
    }

    /// Length -> number of streaks of that length, ordered by length
    pub fn lengths(&self, outcome: Outcome) -> &BTreeMap<usize, usize> {
        match outcome {
            Outcome::A => &self.a,
            Outcome::B => &self.b,
        }
    }

    fn lengths_mut(&mut self, outcome: Outcome) -> &mut BTreeMap<usize, usize> {
        match outcome {
            Outcome::A => &mut self.a,
            Outcome::B => &mut self.b,
        }
    }
}
