//! Status, severity and classification enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Security node availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
    Standby,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
            Self::Standby => write!(f, "standby"),
        }
    }
}

/// Threat severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All severities, in ascending order.
    pub const ALL: [Severity; 3] = [Self::Low, Self::Medium, Self::High];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Kind of detected threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatType {
    DdosAttempt,
    SqlInjection,
    BruteForce,
    SuspiciousApiAccess,
    MalwareSignature,
    ReplayAttack,
}

impl ThreatType {
    /// Every threat type the simulator can synthesize.
    pub const ALL: [ThreatType; 6] = [
        Self::DdosAttempt,
        Self::SqlInjection,
        Self::BruteForce,
        Self::SuspiciousApiAccess,
        Self::MalwareSignature,
        Self::ReplayAttack,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DdosAttempt => "DDoS Attempt",
            Self::SqlInjection => "SQL Injection",
            Self::BruteForce => "Brute Force",
            Self::SuspiciousApiAccess => "Suspicious API Access",
            Self::MalwareSignature => "Malware Signature",
            Self::ReplayAttack => "Replay Attack",
        }
    }
}

impl fmt::Display for ThreatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Proof media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// Bridge link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Inactive,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}
