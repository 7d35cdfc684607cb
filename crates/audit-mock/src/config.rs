//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MockError, MockResult};

/// Placeholder explorer used when no base URL is configured.
pub const DEFAULT_EXPLORER_BASE_URL: &str = "https://explorer.example.com";

/// Simulated round-trip delays, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Delay for plain snapshot fetches.
    #[serde(default = "default_fetch_ms")]
    pub fetch_ms: u64,
    /// Delay for the threat feed.
    #[serde(default = "default_threats_ms")]
    pub threats_ms: u64,
    /// Delay for on-chain verification.
    #[serde(default = "default_verify_ms")]
    pub verify_ms: u64,
}

fn default_fetch_ms() -> u64 {
    500
}

fn default_threats_ms() -> u64 {
    1000
}

fn default_verify_ms() -> u64 {
    1500
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            fetch_ms: default_fetch_ms(),
            threats_ms: default_threats_ms(),
            verify_ms: default_verify_ms(),
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all.
    pub fn zero() -> Self {
        Self {
            fetch_ms: 0,
            threats_ms: 0,
            verify_ms: 0,
        }
    }
}

/// Live activity feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveFeedConfig {
    /// Tick interval in milliseconds.
    #[serde(default = "default_live_feed_interval_ms")]
    pub interval_ms: u64,
    /// Maximum retained entries; oldest are evicted first.
    #[serde(default = "default_live_feed_capacity")]
    pub capacity: usize,
}

fn default_live_feed_interval_ms() -> u64 {
    3000
}

fn default_live_feed_capacity() -> usize {
    10
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_live_feed_interval_ms(),
            capacity: default_live_feed_capacity(),
        }
    }
}

/// Mock generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Base URL for on-chain verification lookup links.
    #[serde(default = "default_explorer_base_url")]
    pub explorer_base_url: String,
    /// Fixed RNG seed. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Identifier recorded as the exporting agent.
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub live_feed: LiveFeedConfig,
}

fn default_explorer_base_url() -> String {
    DEFAULT_EXPLORER_BASE_URL.to_string()
}

fn default_agent_id() -> String {
    "audit-dashboard".to_string()
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            explorer_base_url: default_explorer_base_url(),
            seed: None,
            agent_id: default_agent_id(),
            latency: LatencyConfig::default(),
            live_feed: LiveFeedConfig::default(),
        }
    }
}

impl MockConfig {
    /// Seeded configuration without simulated delay.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            latency: LatencyConfig::zero(),
            ..Self::default()
        }
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> MockResult<()> {
        if self.explorer_base_url.trim().is_empty() {
            return Err(MockError::InvalidConfig(
                "explorer_base_url must not be empty".to_string(),
            ));
        }
        if self.live_feed.capacity == 0 {
            return Err(MockError::InvalidConfig(
                "live_feed.capacity must be at least 1".to_string(),
            ));
        }
        if self.live_feed.interval_ms == 0 {
            return Err(MockError::InvalidConfig(
                "live_feed.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MockConfig::default();
        assert_eq!(config.explorer_base_url, DEFAULT_EXPLORER_BASE_URL);
        assert!(config.seed.is_none());
        assert_eq!(config.latency.fetch_ms, 500);
        assert_eq!(config.live_feed.capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: MockConfig = toml::from_str(
            r#"
            explorer_base_url = "https://scan.test"
            [latency]
            fetch_ms = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.explorer_base_url, "https://scan.test");
        assert_eq!(config.latency.fetch_ms, 5);
        assert_eq!(config.latency.verify_ms, 1500);
        assert_eq!(config.live_feed.interval_ms, 3000);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = MockConfig::deterministic(7);
        config.live_feed.capacity = 0;
        assert!(config.validate().is_err());
    }
}
