//! Record readers for CSV and JSON match files

use crate::{Error, Result};
use std::io::Read;

/// Reads the raw `field` value of every record, in file order.
///
/// A record without the field yields `None`; a file where no record has the
/// field at all is reported as [`Error::MissingColumn`].
pub trait RecordReader {
    fn read_field(&self, input: &mut dyn Read, field: &str) -> Result<Vec<Option<String>>>;
}

/// Comma-separated records with a header row
///
/// A row shorter than the header yields `None` for a missing field. A row
/// longer than the header is malformed.
pub struct CsvRecords;

impl RecordReader for CsvRecords {
    fn read_field(&self, input: &mut dyn Read, field: &str) -> Result<Vec<Option<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?;
        let width = headers.len();
        let column = headers
            .iter()
            .position(|h| h == field)
            .ok_or_else(|| Error::MissingColumn(field.to_string()))?;

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > width {
                let line = record.position().map_or(0, |p| p.line());
                return Err(Error::malformed(format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    width,
                    record.len()
                )));
            }
            values.push(record.get(column).map(str::to_string));
        }
        Ok(values)
    }
}

/// A JSON array of objects
pub struct JsonRecords;

impl RecordReader for JsonRecords {
    fn read_field(&self, input: &mut dyn Read, field: &str) -> Result<Vec<Option<String>>> {
        let document: serde_json::Value = serde_json::from_reader(input)?;
        let serde_json::Value::Array(records) = document else {
            return Err(Error::malformed("expected a JSON array of records"));
        };

        let values: Vec<Option<String>> = records
            .iter()
            .map(|record| match record.get(field) {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(serde_json::Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
            .collect();

        if !records.is_empty() && records.iter().all(|r| r.get(field).is_none()) {
            return Err(Error::MissingColumn(field.to_string()));
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(data: &str) -> Result<Vec<Option<String>>> {
        CsvRecords.read_field(&mut data.as_bytes(), "result")
    }

    fn json(data: &str) -> Result<Vec<Option<String>>> {
        JsonRecords.read_field(&mut data.as_bytes(), "result")
    }

    #[test]
    fn test_csv_reads_result_column() {
        let values = csv("date,result\n2024-01-01,A\n2024-01-02,Player B\n").unwrap();
        assert_eq!(
            values,
            vec![Some("A".to_string()), Some("Player B".to_string())]
        );
    }

    #[test]
    fn test_csv_missing_column() {
        let err = csv("date,winner\n2024-01-01,A\n").unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "result"));

        let err = csv("").unwrap_err();
        assert!(matches!(err, Error::MissingColumn(_)));
    }

    #[test]
    fn test_csv_ragged_rows_are_malformed() {
        let err = csv("date,result\n2024-01-01,A,extra\n").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_csv_short_row_has_no_result() {
        let values = csv("date,result\n2024-01-01,A\n2024-01-02\n2024-01-03,B\n").unwrap();
        assert_eq!(
            values,
            vec![Some("A".to_string()), None, Some("B".to_string())]
        );
    }

    #[test]
    fn test_json_records() {
        let values = json(r#"[{"result": "A"}, {"result": null}, {"other": 1}, {"result": 3}]"#)
            .unwrap();
        assert_eq!(
            values,
            vec![Some("A".to_string()), None, None, Some("3".to_string())]
        );
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(json("{"), Err(Error::MalformedInput(_))));
        assert!(matches!(json(r#"{"result": "A"}"#), Err(Error::MalformedInput(_))));
        assert!(matches!(
            json(r#"[{"winner": "A"}]"#),
            Err(Error::MissingColumn(_))
        ));
        assert_eq!(json("[]").unwrap(), Vec::<Option<String>>::new());
    }
}
