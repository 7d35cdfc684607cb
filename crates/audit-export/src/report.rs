//! Plain-text report encoder.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const BORDER_WIDTH: usize = 50;

/// Human-readable report.
///
/// Layout: bordered uppercase title, export date, total record count, then
/// one numbered block per record. Nested values are indented one level per
/// depth.
pub fn encode_report(
    records: &[Map<String, Value>],
    title: &str,
    exported_at: DateTime<Utc>,
) -> String {
    let border = "=".repeat(BORDER_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "{}", title.to_uppercase());
    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "Export Date: {}", exported_at.to_rfc3339());
    let _ = writeln!(out, "Total Records: {}", records.len());

    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Record {}:", index + 1);
        write_map(&mut out, record, 1);
    }

    out
}

fn write_map(out: &mut String, map: &Map<String, Value>, depth: usize) {
    for (key, value) in map {
        write_entry(out, key, value, depth);
    }
}

fn write_entry(out: &mut String, key: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            let _ = writeln!(out, "{indent}{key}:");
            write_map(out, map, depth + 1);
        }
        Value::Array(items) => {
            let _ = writeln!(out, "{indent}{key}:");
            for (i, item) in items.iter().enumerate() {
                write_entry(out, &format!("[{i}]"), item, depth + 1);
            }
        }
        Value::String(s) => {
            let _ = writeln!(out, "{indent}{key}: {s}");
        }
        other => {
            let _ = writeln!(out, "{indent}{key}: {other}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_report_layout() {
        let records = vec![json!({
            "id": "proof-1",
            "verified": true,
            "metadata": {"device": "Pixel 8", "location": "Denver, CO"}
        })
        .as_object()
        .cloned()
        .unwrap()];

        let report = encode_report(&records, "Audit Media Report", at());
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "AUDIT MEDIA REPORT");
        assert_eq!(lines[2], "=".repeat(50));
        assert_eq!(lines[3], "Export Date: 2024-08-15T10:30:00+00:00");
        assert_eq!(lines[4], "Total Records: 1");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Record 1:");
        assert_eq!(lines[7], "  id: proof-1");
        assert_eq!(lines[8], "  verified: true");
        assert_eq!(lines[9], "  metadata:");
        assert_eq!(lines[10], "    device: Pixel 8");
        assert_eq!(lines[11], "    location: Denver, CO");
    }

    #[test]
    fn test_empty_report_renders_zero() {
        let report = encode_report(&[], "Audit Security Report", at());
        assert!(report.contains("Total Records: 0"));
        assert!(!report.contains("Record 1:"));
    }

    #[test]
    fn test_records_numbered_from_one() {
        let records: Vec<_> = (0..3)
            .map(|i| json!({"n": i}).as_object().cloned().unwrap())
            .collect();
        let report = encode_report(&records, "t", at());
        assert!(report.contains("Record 1:\n  n: 0"));
        assert!(report.contains("Record 3:\n  n: 2"));
    }

    #[test]
    fn test_arrays_indexed() {
        let records = vec![json!({"hops": ["a", {"x": 1}]}).as_object().cloned().unwrap()];
        let report = encode_report(&records, "t", at());
        assert!(report.contains("  hops:\n    [0]: a\n    [1]:\n      x: 1\n"));
    }
}
