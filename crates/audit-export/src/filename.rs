//! Suggested download filenames.

use chrono::{DateTime, Utc};

use audit_core::{ExportFormat, ExportType};

/// `audit-<type>-<YYYY-MM-DD>.<ext>`
pub fn suggested_filename(
    export_type: ExportType,
    format: ExportFormat,
    date: DateTime<Utc>,
) -> String {
    format!(
        "audit-{}-{}.{}",
        export_type,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}
