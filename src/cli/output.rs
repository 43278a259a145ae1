//! Output formatting module
//!
//! This module handles formatting analysis reports and poll results for
//! different output formats.

use crate::Result;
use crate::feed::PollOutcome;
use crate::markov::{Analysis, Outcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

/// One poll as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct PollRecord {
    pub fetched_at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: Option<PollOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PollRecord {
    pub fn from_result(fetched_at: DateTime<Utc>, result: &Result<PollOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                fetched_at,
                outcome: Some(*outcome),
                error: None,
            },
            Err(e) => Self {
                fetched_at,
                outcome: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Output an analysis report as JSON
pub fn output_json(w: &mut impl std::io::Write, analysis: &Analysis) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, analysis)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output the "no data" report as JSON
pub fn output_no_data_json(w: &mut impl std::io::Write, records: usize) -> Result<()> {
    let output = json!({
        "error": "no_valid_data",
        "records": records,
        "message": crate::Error::NoValidData.to_string(),
    });
    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output poll results, plus the analysis of the live sequence if any
pub fn output_poll_json(
    w: &mut impl std::io::Write,
    polls: &[PollRecord],
    analysis: Option<&Analysis>,
) -> Result<()> {
    let output = json!({
        "polls": polls,
        "analysis": analysis,
    });
    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output an analysis report as text table
pub fn output_table(w: &mut impl std::io::Write, analysis: &Analysis) -> Result<()> {
    writeln!(w, "Match Outcome Analysis")?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Results:      {}", analysis.length)?;
    for label in &analysis.labels {
        writeln!(
            w,
            "  {}:            {} (longest streak {})",
            label.outcome, label.occurrences, label.longest_streak
        )?;
    }
    writeln!(w, "  Streaks:      {}", analysis.streaks.len())?;
    writeln!(w, "  Alternations: {}", analysis.alternations)?;
    writeln!(w)?;

    writeln!(w, "Transition Matrix ({}):", analysis.policy.name())?;
    writeln!(w, "{:-<80}", "")?;
    writeln!(
        w,
        "{:<6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "From", "P(A)", "P(B)", "Count A", "Count B", "Est. A", "Est. B"
    )?;
    writeln!(w, "{:-<80}", "")?;
    for from in Outcome::ALL {
        writeln!(
            w,
            "{:<6} {:>10.4} {:>10.4} {:>10} {:>10} {:>10} {:>10}",
            from.label(),
            analysis.matrix.prob(from, Outcome::A),
            analysis.matrix.prob(from, Outcome::B),
            analysis.counts.get(from, Outcome::A),
            analysis.counts.get(from, Outcome::B),
            analysis.estimated_counts.get(from, Outcome::A),
            analysis.estimated_counts.get(from, Outcome::B),
        )?;
    }
    writeln!(w)?;

    writeln!(w, "Streaks:")?;
    let streaks: Vec<String> = analysis
        .streaks
        .iter()
        .map(|s| format!("{}x{}", s.outcome, s.length))
        .collect();
    writeln!(w, "  {}", streaks.join(" "))?;
    writeln!(w)?;

    writeln!(w, "Streak Length Histogram:")?;
    writeln!(w, "  {:<8} {:>6} {:>6}", "Length", "A", "B")?;
    let max_len = analysis
        .labels
        .iter()
        .map(|l| l.longest_streak)
        .max()
        .unwrap_or(0);
    for length in 1..=max_len {
        let a = analysis.histogram.lengths(Outcome::A).get(&length).copied().unwrap_or(0);
        let b = analysis.histogram.lengths(Outcome::B).get(&length).copied().unwrap_or(0);
        if a == 0 && b == 0 {
            continue;
        }
        writeln!(w, "  {:<8} {:>6} {:>6}", length, a, b)?;
    }
    writeln!(w)?;

    let prediction = &analysis.prediction;
    writeln!(w, "Prediction:")?;
    writeln!(w, "  Last result: {}", prediction.last)?;
    writeln!(
        w,
        "  Next result: {} (probability {:.2})",
        prediction.next, prediction.probability
    )?;
    if prediction.tied {
        writeln!(w, "  Tie broken by rule: {}", analysis.tie_break.name())?;
    }

    Ok(())
}

/// Output the "no data" report as text
pub fn output_no_data_table(w: &mut impl std::io::Write, records: usize) -> Result<()> {
    writeln!(w, "{}", crate::Error::NoValidData)?;
    writeln!(w, "  Records read: {}", records)?;
    Ok(())
}

/// Output poll results as text, followed by the analysis table if any
pub fn output_poll_table(
    w: &mut impl std::io::Write,
    polls: &[PollRecord],
    analysis: Option<&Analysis>,
) -> Result<()> {
    writeln!(w, "Polls:")?;
    writeln!(w, "{:-<80}", "")?;
    for poll in polls {
        let status = match (&poll.outcome, &poll.error) {
            (Some(PollOutcome::Appended { outcome, length }), _) => {
                format!("appended {} (sequence length {})", outcome, length)
            }
            (Some(PollOutcome::Unchanged { outcome }), _) => {
                format!("unchanged, last result still {}", outcome)
            }
            (None, Some(error)) => format!("error: {}", error),
            (None, None) => "unknown".to_string(),
        };
        let at = poll.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        writeln!(w, "{:<26} {}", at, status)?;
    }
    writeln!(w)?;

    match analysis {
        Some(analysis) => output_table(w, analysis),
        None => {
            writeln!(w, "{}", crate::Error::NoValidData)?;
            Ok(())
        }
    }
}
