//! Telemetry record types.
//!
//! Every record kind carries exactly one timestamp-like field, exposed through
//! [`TelemetryRecord::timestamp`] for chronological ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::status::{LinkStatus, MediaType, NodeStatus, Severity, ThreatType};

/// Headline counters shown on the overview panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewSnapshot {
    /// Total audit scans performed.
    pub total_scans: u64,
    /// Distinct actors seen.
    pub unique_users: u64,
    /// Amount released to date.
    pub total_released: f64,
    /// Documents verified on-chain.
    pub verified_documents: u64,
    /// Integrity score (0-100).
    pub integrity_score: f64,
    /// Network health score (0-100).
    pub network_health: f64,
    pub timestamp: DateTime<Utc>,
}

/// A monitored security node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityNode {
    pub id: String,
    pub name: String,
    pub status: NodeStatus,
    /// Round-trip latency in milliseconds.
    pub latency_ms: f64,
    pub last_sync: DateTime<Utc>,
    pub active_connections: u32,
    /// Opaque content hash.
    pub hash: String,
}

/// A detected security threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatEvent {
    pub id: String,
    pub threat_type: ThreatType,
    pub severity: Severity,
    pub detected_at: DateTime<Utc>,
    pub resolved: bool,
    pub auto_recovered: bool,
}

/// Capture metadata attached to a media proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub device: String,
    pub location: String,
    pub hash: String,
}

/// Photo or video proof submitted for a sponsored campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProof {
    pub id: String,
    pub campaign: String,
    pub sponsor: String,
    pub media_type: MediaType,
    pub url: String,
    pub verified: bool,
    pub timestamp: DateTime<Utc>,
    pub metadata: MediaMetadata,
}

/// A data-flow link between two bridged systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeLink {
    pub from: String,
    pub to: String,
    pub status: LinkStatus,
    pub latency_ms: f64,
    pub updated_at: DateTime<Utc>,
}

/// Any record the generator produces or the exporter consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryRecord {
    Overview(OverviewSnapshot),
    SecurityNode(SecurityNode),
    Threat(ThreatEvent),
    MediaProof(MediaProof),
    BridgeLink(BridgeLink),
}

impl TelemetryRecord {
    /// The record's chronological field.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Overview(r) => r.timestamp,
            Self::SecurityNode(r) => r.last_sync,
            Self::Threat(r) => r.detected_at,
            Self::MediaProof(r) => r.timestamp,
            Self::BridgeLink(r) => r.updated_at,
        }
    }

    /// Flatten the variant's own fields into an ordered key/value map.
    ///
    /// The `kind` tag is not included; the map is what tabular and report
    /// encoders render.
    pub fn to_fields(&self) -> Result<Map<String, Value>> {
        let value = match self {
            Self::Overview(r) => serde_json::to_value(r)?,
            Self::SecurityNode(r) => serde_json::to_value(r)?,
            Self::Threat(r) => serde_json::to_value(r)?,
            Self::MediaProof(r) => serde_json::to_value(r)?,
            Self::BridgeLink(r) => serde_json::to_value(r)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            // Every variant is a struct, so this is unreachable in practice.
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                Ok(map)
            }
        }
    }
}

impl From<OverviewSnapshot> for TelemetryRecord {
    fn from(r: OverviewSnapshot) -> Self {
        Self::Overview(r)
    }
}

impl From<SecurityNode> for TelemetryRecord {
    fn from(r: SecurityNode) -> Self {
        Self::SecurityNode(r)
    }
}

impl From<ThreatEvent> for TelemetryRecord {
    fn from(r: ThreatEvent) -> Self {
        Self::Threat(r)
    }
}

impl From<MediaProof> for TelemetryRecord {
    fn from(r: MediaProof) -> Self {
        Self::MediaProof(r)
    }
}

impl From<BridgeLink> for TelemetryRecord {
    fn from(r: BridgeLink) -> Self {
        Self::BridgeLink(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_threat() -> ThreatEvent {
        ThreatEvent {
            id: "threat-1".to_string(),
            threat_type: ThreatType::BruteForce,
            severity: Severity::Medium,
            detected_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            resolved: true,
            auto_recovered: false,
        }
    }

    #[test]
    fn test_record_tagging() {
        let record = TelemetryRecord::from(sample_threat());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("{\"kind\":\"threat\""));
        assert!(json.contains("\"threat_type\":\"brute_force\""));

        let back: TelemetryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_to_fields_preserves_declaration_order() {
        let record = TelemetryRecord::from(sample_threat());
        let fields = record.to_fields().unwrap();
        let keys: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "threat_type",
                "severity",
                "detected_at",
                "resolved",
                "auto_recovered"
            ]
        );
        assert!(!fields.contains_key("kind"));
    }

    #[test]
    fn test_timestamp_accessor() {
        let link = BridgeLink {
            from: "Ledger".to_string(),
            to: "Vault".to_string(),
            status: LinkStatus::Active,
            latency_ms: 42.0,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let record = TelemetryRecord::from(link.clone());
        assert_eq!(record.timestamp(), link.updated_at);
    }
}
