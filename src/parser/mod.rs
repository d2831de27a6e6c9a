//! Parsing for the narrow INSERT-statement dialect used by the dump files.
//!
//! This is intentionally not a general SQL parser. The dumps are
//! self-authored and only ever contain flat
//! `INSERT INTO <table> VALUES (...), (...);` statements, so a regex-based
//! extractor plus a single-scan value tokenizer is sufficient.

pub mod statement;
pub mod tokenizer;

pub use statement::{extract_first_insert, extract_inserts, ParsedTable};
pub use tokenizer::{classify_value, tokenize_row};
