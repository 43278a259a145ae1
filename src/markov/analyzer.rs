//! Sequence analyzer
//!
//! Combines the transition model and the streak statistics of a single
//! sequence into one report.

use super::streak::{StreakHistogram, alternations, longest_streak};
use super::{
    EstimatedCounts, EstimationPolicy, Outcome, Prediction, Sequence, Streak, TieBreak,
    TransitionCounts, TransitionMatrix,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Knobs that change how a sequence is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub policy: EstimationPolicy,
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Per-label summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelSummary {
    pub outcome: Outcome,
    pub occurrences: usize,
    pub longest_streak: usize,
}

/// Everything derived from one sequence
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub length: usize,
    pub labels: [LabelSummary; 2],
    pub counts: TransitionCounts,
    pub estimated_counts: EstimatedCounts,
    pub matrix: TransitionMatrix,
    pub policy: EstimationPolicy,
    pub tie_break: TieBreak,
    pub streaks: Vec<Streak>,
    pub alternations: usize,
    pub histogram: StreakHistogram,
    pub prediction: Prediction,
}

impl Analysis {
    /// Analyze a non-empty sequence.
    ///
    /// Returns [`Error::NoValidData`] for an empty sequence instead of a
    /// report with no prediction.
    pub fn from_sequence(sequence: &Sequence, options: AnalysisOptions) -> Result<Self> {
        let Some(last) = sequence.last() else {
            return Err(Error::NoValidData);
        };

        let counts = TransitionCounts::from_sequence(sequence);
        let matrix = TransitionMatrix::estimate(&counts, options.policy);
        let streaks: Vec<Streak> = sequence.streaks().collect();
        let histogram = StreakHistogram::from_streaks(streaks.iter().copied());

        let labels = Outcome::ALL.map(|outcome| LabelSummary {
            outcome,
            occurrences: sequence.count(outcome),
            longest_streak: longest_streak(sequence, outcome),
        });

        let analysis = Self {
            length: sequence.len(),
            labels,
            counts,
            estimated_counts: matrix.estimated_counts(&counts),
            matrix,
            policy: options.policy,
            tie_break: options.tie_break,
            streaks,
            alternations: alternations(sequence),
            histogram,
            prediction: matrix.predict(last, options.tie_break),
        };

        tracing::debug!(
            length = analysis.length,
            streaks = analysis.streaks.len(),
            next = %analysis.prediction.next,
            "Sequence analyzed"
        );

        Ok(analysis)
    }

    pub fn label(&self, outcome: Outcome) -> &LabelSummary {
        &self.labels[outcome.as_index()]
    }
}
