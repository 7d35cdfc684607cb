//! Delimited (CSV-style) encoder.
//!
//! Every header and field is wrapped in double quotes with embedded quotes
//! doubled; nested values are rendered as compact JSON in a single field.
//!
//! [`encode_delimited`] takes the header row from the first record's keys.
//! Later records are rendered against it: a missing key becomes an empty
//! field and extra keys are dropped. Either case is logged.
//!
//! [`encode_delimited_merged`] takes the header from every key seen, in
//! first-seen order, so mixed record kinds keep all of their columns.

use serde_json::{Map, Value};
use tracing::warn;

/// Encode `records` as delimited text with the first record's header.
///
/// Returns `None` (after logging a warning) when there are no records.
pub fn encode_delimited(records: &[Map<String, Value>]) -> Option<String> {
    let Some(first) = records.first() else {
        warn!("No data to export");
        return None;
    };

    let headers: Vec<&String> = first.keys().collect();
    for (index, record) in records.iter().enumerate() {
        let missing = headers.iter().filter(|h| !record.contains_key(**h)).count();
        let extra = record.len() + missing - headers.len();
        if missing > 0 || extra > 0 {
            warn!(row = index, missing, extra, "Record keys differ from header");
        }
    }

    Some(encode_rows(&headers, records))
}

/// Encode `records` as delimited text with the union of all keys as header.
///
/// Records lacking a column get an empty field there. Returns `None` (after
/// logging a warning) when there are no records.
pub fn encode_delimited_merged(records: &[Map<String, Value>]) -> Option<String> {
    if records.is_empty() {
        warn!("No data to export");
        return None;
    }

    let mut headers: Vec<&String> = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if !headers.contains(&key) {
            headers.push(key);
        }
    }

    Some(encode_rows(&headers, records))
}

fn encode_rows(headers: &[&String], records: &[Map<String, Value>]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| quote(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let row = headers
            .iter()
            .map(|h| match record.get(*h) {
                Some(value) => quote(&field_text(value)),
                None => quote(""),
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    lines.join("\n")
}

/// Text form of a field before quoting.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
