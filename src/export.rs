//! CSV export for report data.
//!
//! Headers come from the first record's field order; every cell is
//! double-quoted with embedded quotes doubled, and null or absent values
//! render as an empty quoted cell.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::codegen::write_file;
use crate::record::Record;

#[derive(Debug)]
pub enum ExportError {
    NoData,
    WriteFailed { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoData => write!(f, "no data to export"),
            ExportError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExportError {}

fn csv_cell(value: Option<&JsonValue>) -> String {
    let text = match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Render records as CSV text. Headers are taken from the first record.
pub fn export_csv(records: &[Record]) -> Result<String, ExportError> {
    let Some(first) = records.first() else {
        return Err(ExportError::NoData);
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| format!("\"{}\"", h.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        lines.push(
            headers
                .iter()
                .map(|h| csv_cell(record.get(*h)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    Ok(lines.join("\n"))
}

/// Date-stamped file name for a report: `{stem}_{YYYY-MM-DD}.csv`.
pub fn report_file_name(stem: &str) -> String {
    format!("{}_{}.csv", stem, Utc::now().format("%Y-%m-%d"))
}

/// Export records to a date-stamped CSV file under `dir`. Returns the path
/// of the written file.
pub fn write_csv_report(records: &[Record], dir: &Path, stem: &str) -> Result<PathBuf, ExportError> {
    let content = export_csv(records)?;
    let path = dir.join(report_file_name(stem));
    write_file(&path, content).map_err(|source| ExportError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Record> {
        let mut a = Record::new();
        a.insert("genre_id".to_string(), json!(1));
        a.insert("genre_name".to_string(), json!("Action"));
        let mut b = Record::new();
        b.insert("genre_id".to_string(), json!(2));
        b.insert("genre_name".to_string(), JsonValue::Null);
        vec![a, b]
    }

    #[test]
    fn test_headers_follow_first_record_order() {
        let csv = export_csv(&sample()).unwrap();
        assert!(csv.starts_with("\"genre_id\",\"genre_name\"\n"));
    }

    #[test]
    fn test_all_cells_are_quoted_and_nulls_empty() {
        let csv = export_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"1\",\"Action\"");
        assert_eq!(lines[2], "\"2\",\"\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let mut record = Record::new();
        record.insert("title".to_string(), json!("say \"hi\""));
        let csv = export_csv(&[record]).unwrap();
        assert!(csv.ends_with("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let mut a = Record::new();
        a.insert("id".to_string(), json!(1));
        a.insert("note".to_string(), json!("x"));
        let mut b = Record::new();
        b.insert("id".to_string(), json!(2));
        let csv = export_csv(&[a, b]).unwrap();
        assert!(csv.ends_with("\"2\",\"\""));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(export_csv(&[]), Err(ExportError::NoData)));
    }

    #[test]
    fn test_write_csv_report_stamps_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv_report(&sample(), dir.path(), "genres").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("genres_"));
        assert!(name.ends_with(".csv"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"Action\""));
    }
}
