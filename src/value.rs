//! Literal value type for parsed SQL fields.
//!
//! Every field of a tokenized row is classified into exactly one of these
//! variants. A literal is immutable once emitted by the tokenizer.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// One classified scalar value extracted from a row's text.
///
/// Integer-looking numeric text keeps integer identity (`101` stays `101`)
/// so that re-encoding matches the straightforward numeric parse; text with
/// a decimal point is carried as a float (`4.30` re-encodes as `4.3`).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SqlValue {
    String(String),
    /// Unquoted token that matched neither `NULL` nor the numeric grammar.
    Bareword(String),
    Int(i64),
    Float(f64),
    Null,
}

impl SqlValue {
    /// Convert into a JSON value. Barewords encode as plain strings.
    pub fn into_json(self) -> JsonValue {
        match self {
            SqlValue::String(s) | SqlValue::Bareword(s) => JsonValue::String(s),
            SqlValue::Int(i) => JsonValue::from(i),
            SqlValue::Float(f) => {
                serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
            }
            SqlValue::Null => JsonValue::Null,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::String(s) | SqlValue::Bareword(s) => write!(f, "{}", s),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Float(fl) => write!(f, "{}", fl),
            SqlValue::Null => write!(f, "null"),
        }
    }
}
