//! Owned in-memory telemetry state.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use audit_core::{
    BridgeLink, HealthStatus, LinkStatus, MediaMetadata, MediaProof, MediaType, NodeStatus,
    OverviewSnapshot, SecurityNode, Severity, ThreatEvent, ThreatType,
};

/// Canonical record set behind the generator.
///
/// Callers never receive references into the store; the generator hands out
/// clones.
#[derive(Debug, Clone)]
pub struct TelemetryStore {
    pub overview: OverviewSnapshot,
    pub nodes: Vec<SecurityNode>,
    /// Threat history, newest first.
    pub threats: Vec<ThreatEvent>,
    pub media_proofs: Vec<MediaProof>,
    /// Service name -> health.
    pub bridge_health: BTreeMap<String, HealthStatus>,
    pub bridge_links: Vec<BridgeLink>,
}

impl TelemetryStore {
    /// Store with zeroed counters and no records.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            overview: OverviewSnapshot {
                total_scans: 0,
                unique_users: 0,
                total_released: 0.0,
                verified_documents: 0,
                integrity_score: 0.0,
                network_health: 0.0,
                timestamp: now,
            },
            nodes: Vec::new(),
            threats: Vec::new(),
            media_proofs: Vec::new(),
            bridge_health: BTreeMap::new(),
            bridge_links: Vec::new(),
        }
    }

    /// Baseline data set used by the dashboard, timestamped relative to `now`.
    pub fn fixture(now: DateTime<Utc>) -> Self {
        let ago = |minutes: i64| now - Duration::minutes(minutes);

        let overview = OverviewSnapshot {
            total_scans: 15_847,
            unique_users: 3_291,
            total_released: 284_750.0,
            verified_documents: 12_456,
            integrity_score: 98.7,
            network_health: 99.2,
            timestamp: now,
        };

        let node = |id: &str, name: &str, status, latency_ms, connections, hash: &str, minutes| {
            SecurityNode {
                id: id.to_string(),
                name: name.to_string(),
                status,
                latency_ms,
                last_sync: ago(minutes),
                active_connections: connections,
                hash: hash.to_string(),
            }
        };
        let nodes = vec![
            node("node-1", "Primary Validator", NodeStatus::Online, 45.0, 128, "0x7f3a9c2e41b8d6f0", 1),
            node("node-2", "Backup Validator", NodeStatus::Online, 62.0, 87, "0x2b8e4f1a93c7d5e2", 2),
            node("node-3", "Archive Node", NodeStatus::Standby, 98.0, 12, "0x9d1c6a3f8e2b4705", 15),
            node("node-4", "Edge Relay", NodeStatus::Offline, 150.0, 0, "0x4e7b2d9c1a6f3e88", 240),
        ];

        let threat = |id: &str, threat_type, severity, minutes, resolved, auto_recovered| ThreatEvent {
            id: id.to_string(),
            threat_type,
            severity,
            detected_at: ago(minutes),
            resolved,
            auto_recovered,
        };
        let threats = vec![
            threat("threat-3", ThreatType::SuspiciousApiAccess, Severity::Medium, 12, true, true),
            threat("threat-2", ThreatType::BruteForce, Severity::High, 95, true, false),
            threat("threat-1", ThreatType::DdosAttempt, Severity::Low, 360, true, true),
        ];

        let proof = |id: &str,
                     campaign: &str,
                     sponsor: &str,
                     media_type,
                     verified,
                     minutes,
                     device: &str,
                     location: &str,
                     hash: &str| MediaProof {
            id: id.to_string(),
            campaign: campaign.to_string(),
            sponsor: sponsor.to_string(),
            media_type,
            url: format!("https://media.example.com/proofs/{id}"),
            verified,
            timestamp: ago(minutes),
            metadata: MediaMetadata {
                device: device.to_string(),
                location: location.to_string(),
                hash: hash.to_string(),
            },
        };
        let media_proofs = vec![
            proof(
                "proof-1",
                "Summer Campaign 2024",
                "Sunrise Beverages",
                MediaType::Image,
                true,
                30,
                "iPhone 15 Pro",
                "Los Angeles, CA",
                "0xa1b2c3d4e5f60718",
            ),
            proof(
                "proof-2",
                "Winter Promotion",
                "Northpeak Outdoor",
                MediaType::Video,
                true,
                180,
                "Pixel 8",
                "Denver, CO",
                "0xb2c3d4e5f6071829",
            ),
            proof(
                "proof-3",
                "Endless summer tour",
                "Coastline Audio",
                MediaType::Video,
                false,
                45,
                "Galaxy S24",
                "Miami, FL",
                "0xc3d4e5f60718293a",
            ),
            proof(
                "proof-4",
                "Back to School",
                "Inkwell Supplies",
                MediaType::Image,
                true,
                600,
                "iPad Air",
                "Chicago, IL",
                "0xd4e5f60718293a4b",
            ),
        ];

        let mut bridge_health = BTreeMap::new();
        for (service, status, latency_ms) in [
            ("Audit Ledger", NodeStatus::Online, 42.0),
            ("Media Verifier", NodeStatus::Online, 67.0),
            ("Payment Gateway", NodeStatus::Online, 88.0),
            ("Proof Registry", NodeStatus::Standby, 115.0),
        ] {
            bridge_health.insert(
                service.to_string(),
                HealthStatus {
                    status,
                    latency_ms,
                    last_sync: ago(1),
                },
            );
        }

        let link = |from: &str, to: &str, latency_ms| BridgeLink {
            from: from.to_string(),
            to: to.to_string(),
            status: LinkStatus::Active,
            latency_ms,
            updated_at: ago(1),
        };
        let bridge_links = vec![
            link("Media Verifier", "Audit Ledger", 48.0),
            link("Audit Ledger", "Proof Registry", 63.0),
            link("Proof Registry", "Payment Gateway", 81.0),
            link("Payment Gateway", "Audit Ledger", 55.0),
        ];

        Self {
            overview,
            nodes,
            threats,
            media_proofs,
            bridge_health,
            bridge_links,
        }
    }
}
