//! audit-export - export serializer for audit telemetry.
//!
//! Three encodings of a record snapshot:
//! - delimited text ([`encode_delimited`] with the first record's schema,
//!   [`encode_delimited_merged`] with every record's columns)
//! - structured JSON of the whole payload ([`encode_structured`]), lossless
//! - a plain-text report ([`encode_report`])
//!
//! [`exporter::export`] renders a payload and hands it to an [`ExportSink`].

pub mod delimited;
pub mod error;
pub mod exporter;
pub mod filename;
pub mod report;
pub mod sink;
pub mod structured;

pub use delimited::{encode_delimited, encode_delimited_merged};
pub use error::{ExportError, ExportResult};
pub use exporter::{deliver, export, record_fields, render};
pub use filename::suggested_filename;
pub use report::encode_report;
pub use sink::{Delivery, DirectorySink, ExportSink, MemorySink, RenderedExport};
pub use structured::{decode_structured, encode_structured};
