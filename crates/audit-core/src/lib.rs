//! Core domain types for the audit dashboard.
//!
//! This crate provides the data model shared by the generator, the exporter
//! and the HTTP surface:
//! - `TelemetryRecord`: tagged union over every simulated record kind
//! - `ApiResponse`: the `{success, data, timestamp}` envelope returned by fetches
//! - `ExportPayload`: a typed, timestamped snapshot handed to the exporter
//! - Status, severity and format enums

pub mod envelope;
pub mod error;
pub mod export;
pub mod record;
pub mod status;

pub use envelope::{ActivityEntry, ActivityKind, ApiResponse, HealthStatus, VerificationResult};
pub use error::{CoreError, Result};
pub use export::{ExportFormat, ExportMetadata, ExportPayload, ExportType, SystemInfo};
pub use record::{
    BridgeLink, MediaMetadata, MediaProof, OverviewSnapshot, SecurityNode, TelemetryRecord,
    ThreatEvent,
};
pub use status::{LinkStatus, MediaType, NodeStatus, Severity, ThreatType};
