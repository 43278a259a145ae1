//! Input module - Load match results from files
//!
//! Reads the `result` field of every record, normalizes it and drops
//! anything that is not A or B.

use crate::Result;
use crate::markov::Sequence;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

pub mod normalize;
pub mod records;

pub use normalize::normalize_label;
pub use records::{CsvRecords, JsonRecords, RecordReader};

/// Field holding the match outcome in every input record
pub const RESULT_FIELD: &str = "result";

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Csv,
    Json,
}

impl InputFormat {
    /// Guess the format from the file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }

    fn reader(self) -> &'static dyn RecordReader {
        match self {
            InputFormat::Csv => &CsvRecords,
            InputFormat::Json => &JsonRecords,
        }
    }
}

/// A filtered sequence together with how much was thrown away
#[derive(Debug, Clone)]
pub struct LoadedSequence {
    pub sequence: Sequence,
    pub records: usize,
    pub rejected: usize,
}

/// Normalize raw labels and keep only A/B, preserving order
pub fn filter_labels<I, S>(labels: I) -> LoadedSequence
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut sequence = Sequence::new();
    let mut records = 0;
    let mut rejected = 0;

    for (row, label) in labels.into_iter().enumerate() {
        records += 1;
        match label.as_ref().and_then(|l| normalize_label(l.as_ref())) {
            Some(outcome) => sequence.push(outcome),
            None => {
                rejected += 1;
                tracing::debug!(
                    row,
                    label = label.as_ref().map(|l| l.as_ref()).unwrap_or("<missing>"),
                    "Skipping invalid result"
                );
            }
        }
    }

    if rejected > 0 {
        tracing::warn!("Skipped {} of {} records with invalid results", rejected, records);
    }

    LoadedSequence {
        sequence,
        records,
        rejected,
    }
}

/// Read and filter records from any reader
pub fn load_reader(input: &mut dyn Read, format: InputFormat) -> Result<LoadedSequence> {
    let labels = format.reader().read_field(input, RESULT_FIELD)?;
    Ok(filter_labels(labels))
}

/// Read and filter records from a file
pub fn load_file(path: &Path, format: Option<InputFormat>) -> Result<LoadedSequence> {
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    tracing::info!("Loading {:?} as {:?}", path, format);

    let mut file = std::fs::File::open(path)?;
    let loaded = load_reader(&mut file, format)?;

    tracing::info!(
        "Loaded {} valid results from {} records",
        loaded.sequence.len(),
        loaded.records
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::markov::Outcome::{A, B};
    use std::io::Write;

    #[test]
    fn test_filter_keeps_order() {
        let loaded = filter_labels(vec![
            Some("A"),
            Some("draw"),
            None,
            Some("Player B"),
            Some("a"),
        ]);
        assert_eq!(loaded.sequence.as_slice(), &[A, B, A]);
        assert_eq!(loaded.records, 5);
        assert_eq!(loaded.rejected, 2);
    }

    #[test]
    fn test_all_invalid_is_empty() {
        let loaded = filter_labels(vec![Some("X"), Some("Y")]);
        assert!(loaded.sequence.is_empty());
        assert_eq!(loaded.rejected, 2);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("a.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("a.csv")), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("results")), InputFormat::Csv);
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "match,result").unwrap();
        writeln!(file, "1,A").unwrap();
        writeln!(file, "2,A").unwrap();
        writeln!(file, "3,C").unwrap();
        writeln!(file, "4,B").unwrap();
        file.flush().unwrap();

        let loaded = load_file(file.path(), None).unwrap();
        assert_eq!(loaded.sequence.as_slice(), &[A, A, B]);
        assert_eq!(loaded.rejected, 1);
    }

    #[test]
    fn test_short_csv_row_is_rejected() {
        let mut data = "date,result\n2024-01-01,A\n2024-01-02\n2024-01-03,B\n".as_bytes();
        let loaded = load_reader(&mut data, InputFormat::Csv).unwrap();
        assert_eq!(loaded.sequence.as_slice(), &[A, B]);
        assert_eq!(loaded.records, 3);
        assert_eq!(loaded.rejected, 1);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"result": "Team A"}}, {{"result": "Team B"}}]"#).unwrap();
        file.flush().unwrap();

        let loaded = load_file(file.path(), None).unwrap();
        assert_eq!(loaded.sequence.as_slice(), &[A, B]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/results.csv"), None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
