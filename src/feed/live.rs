//! Live sequence accumulated from feed polls
//!
//! A [`LiveSequence`] is an owned value: whoever polls holds it by `&mut`,
//! so only one fetch-and-append can run at a time.
//!
//! Duplicate suppression compares the fetched result with the last stored
//! one. A feed that reports the same winner twice in a row because two
//! consecutive matches really ended the same way is indistinguishable from a
//! feed that has no new match yet; both leave the sequence unchanged.

use super::ResultFeed;
use crate::input::normalize_label;
use crate::markov::{EstimationPolicy, Outcome, Sequence, TransitionMatrix};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of [`LiveSequence::append_if_changed`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppendOutcome {
    /// The outcome was stored; the matrix is recomputed from the whole sequence
    Appended(TransitionMatrix),
    /// The outcome equals the current last element and was dropped
    Unchanged,
}

/// Process-lifetime sequence fed one result at a time
#[derive(Debug, Clone)]
pub struct LiveSequence {
    sequence: Sequence,
    policy: EstimationPolicy,
    matrix: TransitionMatrix,
    updated_at: Option<DateTime<Utc>>,
}

impl LiveSequence {
    pub fn new(policy: EstimationPolicy) -> Self {
        Self::seeded(Sequence::new(), policy)
    }

    /// Start from previously loaded results
    pub fn seeded(sequence: Sequence, policy: EstimationPolicy) -> Self {
        let matrix = TransitionMatrix::from_sequence(&sequence, policy);
        Self {
            sequence,
            policy,
            matrix,
            updated_at: None,
        }
    }

    /// Append `outcome` unless it repeats the last stored outcome
    pub fn append_if_changed(&mut self, outcome: Outcome) -> AppendOutcome {
        if self.sequence.last() == Some(outcome) {
            return AppendOutcome::Unchanged;
        }

        self.sequence.push(outcome);
        self.matrix = TransitionMatrix::from_sequence(&self.sequence, self.policy);
        self.updated_at = Some(Utc::now());
        AppendOutcome::Appended(self.matrix)
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Time of the last successful append
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// What one poll did to the live sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollOutcome {
    /// New result stored
    Appended { outcome: Outcome, length: usize },
    /// Fetched result equals the last known one; nothing changed
    Unchanged { outcome: Outcome },
}

/// Fetch one result and append it if it differs from the last one.
///
/// On [`Error::FetchFailure`] or [`Error::InvalidLabel`] the sequence is left
/// untouched.
pub async fn poll_once(feed: &dyn ResultFeed, live: &mut LiveSequence) -> Result<PollOutcome> {
    let raw = feed.fetch_result().await?;
    let outcome = normalize_label(&raw).ok_or(Error::InvalidLabel(raw))?;

    match live.append_if_changed(outcome) {
        AppendOutcome::Appended(_) => {
            tracing::info!(
                %outcome,
                length = live.sequence().len(),
                "Appended new result"
            );
            Ok(PollOutcome::Appended {
                outcome,
                length: live.sequence().len(),
            })
        }
        AppendOutcome::Unchanged => {
            tracing::info!(%outcome, "No new result");
            Ok(PollOutcome::Unchanged { outcome })
        }
    }
}
