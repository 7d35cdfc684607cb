//! Export facade: payload -> encoding -> sink.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use audit_core::{ExportFormat, ExportPayload, TelemetryRecord};
use audit_telemetry::Metrics;

use crate::delimited::encode_delimited_merged;
use crate::error::ExportResult;
use crate::filename::suggested_filename;
use crate::report::encode_report;
use crate::sink::{Delivery, ExportSink, RenderedExport};
use crate::structured::encode_structured;

/// Flatten records into per-record field maps.
pub fn record_fields(records: &[TelemetryRecord]) -> ExportResult<Vec<Map<String, Value>>> {
    records
        .iter()
        .map(|r| r.to_fields().map_err(Into::into))
        .collect()
}

/// Encode `payload` in `format` and attach filename and MIME type.
///
/// Returns `Ok(None)` when the delimited encoder refuses an empty payload.
pub fn render(payload: &ExportPayload, format: ExportFormat) -> ExportResult<Option<RenderedExport>> {
    let content = match format {
        ExportFormat::Csv => {
            // Security exports mix nodes and threats; keep both schemas.
            let fields = record_fields(&payload.data)?;
            match encode_delimited_merged(&fields) {
                Some(content) => content,
                None => {
                    Metrics::export_refused(format.extension());
                    return Ok(None);
                }
            }
        }
        ExportFormat::Json => encode_structured(payload)?,
        ExportFormat::Txt => {
            let fields = record_fields(&payload.data)?;
            encode_report(&fields, &payload.export_type.report_title(), payload.timestamp)
        }
    };

    Metrics::export(payload.export_type.as_str(), format.extension());
    debug!(
        export_type = %payload.export_type,
        format = %format,
        records = payload.metadata.record_count,
        bytes = content.len(),
        "Export rendered"
    );

    Ok(Some(RenderedExport {
        content,
        filename: suggested_filename(payload.export_type, format, payload.timestamp),
        mime_type: format.mime_type().to_string(),
    }))
}

/// Hand already-encoded content to a sink.
pub fn deliver(
    sink: &dyn ExportSink,
    content: &str,
    suggested_filename: &str,
    mime_type: &str,
) -> ExportResult<Delivery> {
    sink.deliver(&RenderedExport {
        content: content.to_string(),
        filename: suggested_filename.to_string(),
        mime_type: mime_type.to_string(),
    })
}

/// Render and deliver. `Ok(None)` means nothing was produced.
pub fn export(
    payload: &ExportPayload,
    format: ExportFormat,
    sink: &dyn ExportSink,
) -> ExportResult<Option<Delivery>> {
    let Some(rendered) = render(payload, format)? else {
        warn!(export_type = %payload.export_type, format = %format, "Export skipped: no records");
        return Ok(None);
    };
    sink.deliver(&rendered).map(Some)
}
