//! Row materialization: positional literal sequences into named-field records.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::schema::TableKind;
use crate::value::SqlValue;

/// A named-field record. Field insertion order follows schema order, never
/// source order, once materialized.
pub type Record = IndexMap<String, JsonValue>;

/// Materialize the rows of one table into records.
///
/// Known tables zip values against the schema columns by position; the zip
/// stops at the shorter side, so short rows simply omit trailing fields and
/// excess values are silently dropped. Unknown tables fall back to synthetic
/// positional names (`col_0`, `col_1`, ...) with a non-fatal warning.
pub fn rows_to_records(table: &str, rows: Vec<Vec<SqlValue>>) -> Vec<Record> {
    match TableKind::from_name(table) {
        Some(kind) => rows
            .into_iter()
            .map(|row| zip_row(kind.columns(), row))
            .collect(),
        None => {
            warn!(table, "unknown table, using positional column names");
            rows.into_iter().map(positional_record).collect()
        }
    }
}

fn zip_row(columns: &[&str], row: Vec<SqlValue>) -> Record {
    columns
        .iter()
        .zip(row)
        .map(|(col, value)| (col.to_string(), value.into_json()))
        .collect()
}

fn positional_record(row: Vec<SqlValue>) -> Record {
    row.into_iter()
        .enumerate()
        .map(|(i, value)| (format!("col_{}", i), value.into_json()))
        .collect()
}
