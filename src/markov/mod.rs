//! Markov module - Transition model and streak statistics over match outcomes
//!
//! Everything here is a pure function of a [`Sequence`].

pub mod analyzer;
pub mod outcome;
pub mod streak;
pub mod transition;

// Re-export key types
pub use analyzer::{Analysis, AnalysisOptions, LabelSummary};
pub use outcome::{Outcome, Sequence};
pub use streak::{Streak, StreakHistogram, Streaks};
pub use transition::{
    EstimatedCounts, EstimationPolicy, Prediction, TieBreak, TransitionCounts, TransitionMatrix,
    UNIFORM_ROW,
};

