//! Dashboard API types.
//!
//! These types are used for JSON serialization in REST and WebSocket APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use audit_core::ActivityEntry;

/// WebSocket message types (tagged enum for type safety).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardMessage {
    /// Retained activity, newest first (sent on connect).
    Snapshot {
        timestamp: DateTime<Utc>,
        entries: Vec<ActivityEntry>,
    },
    /// A new live-feed entry.
    Activity(ActivityEntry),
}

/// `?campaign=` filter for media proofs.
#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub campaign: Option<String>,
}

/// `?format=` selector for exports.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Result of saving an export through the configured sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReceipt {
    pub filename: String,
    pub location: String,
    pub bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::ActivityKind;

    #[test]
    fn test_message_tagging() {
        let msg = DashboardMessage::Activity(ActivityEntry {
            id: "a-1".to_string(),
            kind: ActivityKind::Alert,
            message: "Brute Force detected and contained".to_string(),
            timestamp: Utc::now(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"activity\""));
        assert!(json.contains("\"kind\":\"alert\""));
    }

    #[test]
    fn test_snapshot_tagging() {
        let msg = DashboardMessage::Snapshot {
            timestamp: Utc::now(),
            entries: vec![],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.starts_with("{\"type\":\"snapshot\""));
    }
}
