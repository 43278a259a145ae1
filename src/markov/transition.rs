//! Transition counting and first-order probability estimation

use crate::markov::{Outcome, Sequence};
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Row emitted for a state with no observed outgoing transitions
pub const UNIFORM_ROW: [f64; 2] = [0.5, 0.5];

/// How a row of counts becomes a row of probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationPolicy {
    /// Observed frequency (count / row total), [`UNIFORM_ROW`] when the row is empty
    #[default]
    MaximumLikelihood,
    /// Add-one smoothing: (count + 1) / (row total + 2)
    Laplace,
}

/// Which outcome to predict when both probabilities in a row are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    #[default]
    PreferA,
    PreferB,
    /// Predict the last observed outcome again
    Repeat,
}

impl EstimationPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            EstimationPolicy::MaximumLikelihood => "maximum-likelihood",
            EstimationPolicy::Laplace => "laplace",
        }
    }
}

impl TieBreak {
    pub fn name(&self) -> &'static str {
        match self {
            TieBreak::PreferA => "prefer-a",
            TieBreak::PreferB => "prefer-b",
            TieBreak::Repeat => "repeat",
        }
    }

    fn resolve(self, last: Outcome) -> Outcome {
        match self {
            TieBreak::PreferA => Outcome::A,
            TieBreak::PreferB => Outcome::B,
            TieBreak::Repeat => last,
        }
    }
}

/// Exact number of observed (previous, current) pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionCounts {
    counts: [[u64; 2]; 2],
}

impl TransitionCounts {
    /// Count every adjacent pair in the sequence.
    ///
    /// Sequences shorter than two elements produce all-zero counts.
    pub fn from_sequence(sequence: &Sequence) -> Self {
        let mut counts = Self::default();
        for (prev, curr) in sequence.pairs() {
            counts.record(prev, curr);
        }
        counts
    }

    pub fn record(&mut self, from: Outcome, to: Outcome) {
        self.counts[from.as_index()][to.as_index()] += 1;
    }

    pub fn get(&self, from: Outcome, to: Outcome) -> u64 {
        self.counts[from.as_index()][to.as_index()]
    }

    /// Total outgoing transitions observed from `from`
    pub fn row_total(&self, from: Outcome) -> u64 {
        self.counts[from.as_index()].iter().sum()
    }

    pub fn total(&self) -> u64 {
        Outcome::ALL.iter().map(|&s| self.row_total(s)).sum()
    }
}

/// Row-stochastic 2x2 transition matrix over [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionMatrix {
    probs: [[f64; 2]; 2],
    policy: EstimationPolicy,
}

impl TransitionMatrix {
    /// Estimate the matrix from exact counts.
    ///
    /// This is the only estimator in the crate; both file analysis and the
    /// live feed go through it.
    pub fn estimate(counts: &TransitionCounts, policy: EstimationPolicy) -> Self {
        let mut probs = [UNIFORM_ROW; 2];
        for from in Outcome::ALL {
            let total = counts.row_total(from);
            let row = &mut probs[from.as_index()];
            match policy {
                EstimationPolicy::MaximumLikelihood => {
                    if total == 0 {
                        *row = UNIFORM_ROW;
                    } else {
                        for to in Outcome::ALL {
                            row[to.as_index()] = counts.get(from, to) as f64 / total as f64;
                        }
                    }
                }
                EstimationPolicy::Laplace => {
                    for to in Outcome::ALL {
                        row[to.as_index()] =
                            (counts.get(from, to) + 1) as f64 / (total + 2) as f64;
                    }
                }
            }
        }
        Self { probs, policy }
    }

    /// Count and estimate in one step
    pub fn from_sequence(sequence: &Sequence, policy: EstimationPolicy) -> Self {
        Self::estimate(&TransitionCounts::from_sequence(sequence), policy)
    }

    pub fn prob(&self, from: Outcome, to: Outcome) -> f64 {
        self.probs[from.as_index()][to.as_index()]
    }

    pub fn row(&self, from: Outcome) -> &[f64; 2] {
        &self.probs[from.as_index()]
    }

    pub fn policy(&self) -> EstimationPolicy {
        self.policy
    }

    /// Predict the outcome following `last`.
    ///
    /// Picks the more probable column of `last`'s row; equal probabilities
    /// are settled by `tie_break`.
    pub fn predict(&self, last: Outcome, tie_break: TieBreak) -> Prediction {
        let row = self.row(last);
        let (p_a, p_b) = (row[Outcome::A.as_index()], row[Outcome::B.as_index()]);

        let tied = (p_a - p_b).abs() <= f64::EPSILON;
        let next = if tied {
            tie_break.resolve(last)
        } else if p_a > p_b {
            Outcome::A
        } else {
            Outcome::B
        };

        Prediction {
            last,
            next,
            probability: self.prob(last, next),
            tied,
        }
    }

    /// Reconstruct approximate integer counts as round(probability × row total).
    ///
    /// These agree with the exact counts under maximum likelihood but not
    /// under smoothing, so callers wanting real counts should use
    /// [`TransitionCounts`] instead.
    pub fn estimated_counts(&self, counts: &TransitionCounts) -> EstimatedCounts {
        let mut estimated = [[0u64; 2]; 2];
        for from in Outcome::ALL {
            let total = counts.row_total(from) as f64;
            for to in Outcome::ALL {
                estimated[from.as_index()][to.as_index()] =
                    (self.prob(from, to) * total).round() as u64;
            }
        }
        EstimatedCounts { counts: estimated }
    }
}

impl Serialize for TransitionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_grid(serializer, |from, to| self.prob(from, to))
    }
}

impl Serialize for TransitionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_grid(serializer, |from, to| self.get(from, to))
    }
}

/// Counts derived from probabilities, see [`TransitionMatrix::estimated_counts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatedCounts {
    counts: [[u64; 2]; 2],
}

impl EstimatedCounts {
    pub fn get(&self, from: Outcome, to: Outcome) -> u64 {
        self.counts[from.as_index()][to.as_index()]
    }
}

impl Serialize for EstimatedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_grid(serializer, |from, to| self.get(from, to))
    }
}

/// Writes `{"A": {"A": .., "B": ..}, "B": {...}}`
fn serialize_grid<S, T, F>(serializer: S, cell: F) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
    F: Fn(Outcome, Outcome) -> T,
{
    let mut outer = serializer.serialize_map(Some(2))?;
    for from in Outcome::ALL {
        let row: Vec<(&str, T)> = Outcome::ALL
            .iter()
            .map(|&to| (to.label(), cell(from, to)))
            .collect();
        outer.serialize_entry(from.label(), &RowMap(row))?;
    }
    outer.end()
}

struct RowMap<T>(Vec<(&'static str, T)>);

impl<T: Serialize> Serialize for RowMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Predicted next outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Outcome the prediction conditions on
    pub last: Outcome,
    pub next: Outcome,
    pub probability: f64,
    /// True when both candidates were equally likely and the tie-break rule decided
    pub tied: bool,
}
