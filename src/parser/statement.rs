//! INSERT-statement extraction from dump file text.
//!
//! Statements are located with a case-insensitive regex and terminated at the
//! first semicolon after `VALUES`. A semicolon embedded in a quoted literal
//! would mis-terminate the match; the dumps never contain one, so the
//! limitation is kept rather than silently widened.

use regex::Regex;
use tracing::debug;

use crate::parser::tokenizer::tokenize_row;
use crate::value::SqlValue;

/// One extracted `INSERT INTO <table> VALUES ...;` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    /// Table identifier captured verbatim (case preserved, backticks stripped).
    pub table: String,
    /// One tokenized literal sequence per parenthesized row, in source order.
    pub rows: Vec<Vec<SqlValue>>,
}

fn insert_pattern() -> Regex {
    Regex::new(r"(?is)INSERT\s+INTO\s+`?(\w+)`?\s+VALUES\s+(.+?);")
        .expect("insert pattern is a valid regex")
}

fn row_pattern() -> Regex {
    // Flat tuples only; nested parentheses are not part of the dialect.
    Regex::new(r"\(([^)]+)\)").expect("row pattern is a valid regex")
}

/// Extract the first INSERT statement found in `content`, if any.
///
/// The primary sync path only ever inspects the first statement per file.
/// Absence of a match is a normal outcome, not an error.
pub fn extract_first_insert(content: &str) -> Option<ParsedTable> {
    let caps = insert_pattern().captures(content)?;
    Some(parse_captured(&caps[1], &caps[2]))
}

/// Extract every INSERT statement found in `content`, in source order.
pub fn extract_inserts(content: &str) -> Vec<ParsedTable> {
    insert_pattern()
        .captures_iter(content)
        .map(|caps| parse_captured(&caps[1], &caps[2]))
        .collect()
}

fn parse_captured(table: &str, values_text: &str) -> ParsedTable {
    let rows: Vec<Vec<SqlValue>> = row_pattern()
        .captures_iter(values_text)
        .map(|caps| tokenize_row(&caps[1]))
        .collect();
    debug!(table, rows = rows.len(), "extracted insert statement");
    ParsedTable {
        table: table.to_string(),
        rows,
    }
}
