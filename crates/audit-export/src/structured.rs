//! Structured (JSON) encoder.

use audit_core::ExportPayload;

use crate::error::ExportResult;

/// Indented JSON for the full payload. Keys keep declaration order.
pub fn encode_structured(payload: &ExportPayload) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// Parse a payload previously produced by [`encode_structured`].
pub fn decode_structured(text: &str) -> ExportResult<ExportPayload> {
    Ok(serde_json::from_str(text)?)
}
