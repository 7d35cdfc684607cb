//! Export payload and format types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::TelemetryRecord;

/// Which dataset an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    Overview,
    Security,
    Media,
    Bridge,
}

impl ExportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Security => "security",
            Self::Media => "media",
            Self::Bridge => "bridge",
        }
    }

    /// Title used by the plain-text report.
    pub fn report_title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("Audit {capitalized} Report")
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "security" => Ok(Self::Security),
            "media" => Ok(Self::Media),
            "bridge" => Ok(Self::Bridge),
            _ => Err(CoreError::InvalidExportType(s.to_string())),
        }
    }
}

/// Output encoding of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Delimited text.
    Csv,
    /// Structured text.
    Json,
    /// Plain-text report.
    Txt,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Txt => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(CoreError::InvalidExportFormat(s.to_string())),
        }
    }
}

/// Health sub-snapshot embedded in export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub network_health: f64,
    /// Uptime percentage.
    pub uptime: f64,
    pub last_sync: DateTime<Utc>,
}

/// Export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,
    pub exported_by: String,
    pub system_info: SystemInfo,
}

/// A snapshot of records prepared for export.
///
/// Created at export time, handed to a sink, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(rename = "type")]
    pub export_type: ExportType,
    pub timestamp: DateTime<Utc>,
    pub data: Vec<TelemetryRecord>,
    pub metadata: ExportMetadata,
}

impl ExportPayload {
    /// Build a payload; the record count is derived from `data`.
    pub fn new(
        export_type: ExportType,
        data: Vec<TelemetryRecord>,
        exported_by: impl Into<String>,
        system_info: SystemInfo,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let record_count = data.len();
        Self {
            export_type,
            timestamp,
            data,
            metadata: ExportMetadata {
                record_count,
                exported_by: exported_by.into(),
                system_info,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_type_parse() {
        assert_eq!("Security".parse::<ExportType>().unwrap(), ExportType::Security);
        assert!("ledger".parse::<ExportType>().is_err());
        assert_eq!(ExportType::Bridge.report_title(), "Audit Bridge Report");
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
    }

    #[test]
    fn test_payload_key_order() {
        let now = Utc::now();
        let payload = ExportPayload::new(
            ExportType::Media,
            vec![],
            "tester",
            SystemInfo {
                network_health: 99.0,
                uptime: 99.9,
                last_sync: now,
            },
            now,
        );
        assert_eq!(payload.metadata.record_count, 0);

        let value = serde_json::to_value(&payload).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["type", "timestamp", "data", "metadata"]);
        assert_eq!(value["type"], "media");
    }
}
