//! Prometheus metrics for the audit dashboard.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means a duplicate metric
//! name, which is a programming error surfaced at first use.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};

use crate::error::TelemetryResult;

/// Generator fetches served.
/// Labels: operation
pub static FETCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "audit_fetch_total",
        "Total simulated fetch operations served",
        &["operation"]
    )
    .unwrap()
});

/// Exports rendered and delivered.
/// Labels: type, format
pub static EXPORT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "audit_export_total",
        "Total exports rendered",
        &["type", "format"]
    )
    .unwrap()
});

/// Exports refused because there was nothing to encode.
pub static EXPORT_REFUSED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "audit_export_refused_total",
        "Total exports refused for empty input",
        &["format"]
    )
    .unwrap()
});

/// Wrapped request failures.
pub static REQUEST_FAILED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "audit_request_failed_total",
        "Total request failures re-signalled by the request wrapper",
        &["operation"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a served fetch.
    pub fn fetch(operation: &str) {
        FETCH_TOTAL.with_label_values(&[operation]).inc();
    }

    /// Record a rendered export.
    pub fn export(export_type: &str, format: &str) {
        EXPORT_TOTAL
            .with_label_values(&[export_type, format])
            .inc();
    }

    /// Record an export refused for empty input.
    pub fn export_refused(format: &str) {
        EXPORT_REFUSED_TOTAL.with_label_values(&[format]).inc();
    }

    /// Record a wrapped request failure.
    pub fn request_failed(operation: &str) {
        REQUEST_FAILED_TOTAL.with_label_values(&[operation]).inc();
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buf = Vec::new();
        encoder.encode(&families, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
