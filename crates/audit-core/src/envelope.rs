//! Response envelope and auxiliary fetch result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::NodeStatus;

/// Envelope wrapping every generator response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful result.
    pub fn ok(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp,
        }
    }

    /// Transform the payload, keeping the envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: f(self.data),
            timestamp: self.timestamp,
        }
    }
}

/// Health of one bridged service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: NodeStatus,
    pub latency_ms: f64,
    pub last_sync: DateTime<Utc>,
}

/// Result of an on-chain verification lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub hash: String,
    pub block_number: u64,
    pub explorer_url: String,
    pub timestamp: DateTime<Utc>,
}

/// Category of a live-feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Scan,
    Verification,
    Release,
    Alert,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [Self::Scan, Self::Verification, Self::Release, Self::Alert];
}

/// One entry of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub kind: ActivityKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
