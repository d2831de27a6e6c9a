//! Emitter for the generated seed-data module.
//!
//! Records render as `json!({ ... })` blocks inside `vec![ ... ]` literals,
//! 2-space base indentation with 2-space increments per nesting level. The
//! interior of every record is plain JSON, so `decode(encode(x)) == x` holds
//! for everything the materializer can produce.

use chrono::Utc;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::record::Record;

/// The parsed dataset handed to the emitter: export key (e.g. `movies`,
/// `watchHistory`) to the records extracted for that table, in sync order.
pub type Dataset = IndexMap<String, Vec<Record>>;

/// Format one JSON value with nested collections indented by successive
/// 2-space increments. `indent` is the column of nested entries; scalars
/// encode through `serde_json` (exact numeric formatting, proper string
/// escaping, `null`).
pub fn format_value(value: &JsonValue, indent: usize) -> String {
    match value {
        JsonValue::Array(items) => {
            if items.is_empty() {
                return "[]".to_string();
            }
            let pad = " ".repeat(indent);
            let entries: Vec<String> = items
                .iter()
                .map(|item| format!("{}{}", pad, format_value(item, indent + 2)))
                .collect();
            format!(
                "[\n{}\n{}]",
                entries.join(",\n"),
                " ".repeat(indent.saturating_sub(2))
            )
        }
        JsonValue::Object(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let pad = " ".repeat(indent);
            let entries: Vec<String> = map
                .iter()
                .map(|(key, val)| format!("{}: {}", encode_scalar(&JsonValue::String(key.clone())), format_value(val, indent + 2)))
                .collect();
            format!(
                "{{\n{}{}\n{}}}",
                pad,
                entries.join(&format!(",\n{}", pad)),
                " ".repeat(indent.saturating_sub(2))
            )
        }
        scalar => encode_scalar(scalar),
    }
}

/// Format one record as a brace-delimited `"key": value` block, one entry
/// per line, in the record's own (schema) field order.
pub fn format_record(record: &Record, indent: usize) -> String {
    if record.is_empty() {
        return "{}".to_string();
    }
    let pad = " ".repeat(indent);
    let entries: Vec<String> = record
        .iter()
        .map(|(key, val)| {
            format!(
                "{}: {}",
                encode_scalar(&JsonValue::String(key.clone())),
                format_value(val, indent + 2)
            )
        })
        .collect();
    format!(
        "{{\n{}{}\n{}}}",
        pad,
        entries.join(&format!(",\n{}", pad)),
        " ".repeat(indent.saturating_sub(2))
    )
}

/// Format a sequence of records as a `vec![ ... ]` literal with one
/// comma-terminated `json!` element per line. An empty sequence renders as
/// an empty-bracket literal.
pub fn format_collection(records: &[Record], indent: usize) -> String {
    if records.is_empty() {
        return "vec![]".to_string();
    }
    let pad = " ".repeat(indent);
    let mut out = String::from("vec![\n");
    for record in records {
        out.push_str(&pad);
        out.push_str("json!(");
        out.push_str(&format_record(record, indent + 2));
        out.push_str("),\n");
    }
    out.push_str(&" ".repeat(indent.saturating_sub(2)));
    out.push(']');
    out
}

fn encode_scalar(value: &JsonValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Generate the full seed-data module source from a parsed dataset.
///
/// The module exports one collection per dataset entry plus a header noting
/// it is machine-generated and the generation timestamp.
pub fn generate_seed_module(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str("//! Seed data extracted from the SQL dump files.\n");
    out.push_str("//!\n");
    out.push_str("//! @generated by `cinesync sync`. Do not edit manually; rerun the sync\n");
    out.push_str("//! whenever the dump files change.\n");
    out.push_str(&format!("//! Last synced: {}\n", Utc::now().to_rfc3339()));
    out.push_str("\n");
    out.push_str("use serde_json::{json, Value};\n");

    for (key, records) in dataset {
        let fn_name = format!("{}_data", key.to_case(Case::Snake));
        out.push_str("\n");
        out.push_str(&format!("/// Rows parsed from the `{}` dump.\n", key));
        out.push_str(&format!("pub fn {}() -> Vec<Value> {{\n", fn_name));
        out.push_str(&format!("  {}\n", format_collection(records, 4)));
        out.push_str("}\n");
    }

    out
}
