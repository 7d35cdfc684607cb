//! Mock telemetry generator.
//!
//! Every fetch waits for a simulated round trip, then answers from the owned
//! [`TelemetryStore`]. Only the threat feed and the two bridge fetches mutate
//! the store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use audit_core::{
    ApiResponse, BridgeLink, ExportType, HealthStatus, LinkStatus, MediaProof, OverviewSnapshot,
    SecurityNode, Severity, SystemInfo, TelemetryRecord, ThreatEvent, ThreatType,
    VerificationResult,
};
use audit_telemetry::Metrics;

use crate::clock::{Clock, SystemClock};
use crate::config::MockConfig;
use crate::store::TelemetryStore;
use crate::walk::{
    self, BRIDGE_FLOW_LATENCY_RANGE, BRIDGE_FLOW_STEP_MS, NODE_LATENCY_RANGE, NODE_LATENCY_STEP_MS,
};

/// Lowest block number a fabricated verification reports.
pub const BLOCK_NUMBER_MIN: u64 = 18_000_000;
/// Exclusive upper bound for fabricated block numbers.
pub const BLOCK_NUMBER_MAX: u64 = 19_000_000;

/// Probability that a bridge link reports `inactive` on a flow fetch.
pub const LINK_INACTIVE_PROBABILITY: f64 = 0.1;

/// Uptime percentage reported in export metadata.
pub const REPORTED_UPTIME_PCT: f64 = 99.97;

/// Simulated telemetry backend.
pub struct MockGenerator {
    config: MockConfig,
    store: RwLock<TelemetryStore>,
    rng: Mutex<StdRng>,
    clock: Arc<dyn Clock>,
}

impl MockGenerator {
    /// Generator over the fixture data set with the wall clock.
    pub fn new(config: MockConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = TelemetryStore::fixture(clock.now());
        Self::with_parts(config, store, clock)
    }

    /// Generator over an explicit store and clock.
    pub fn with_parts(config: MockConfig, store: TelemetryStore, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            store: RwLock::new(store),
            rng: Mutex::new(rng),
            clock,
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    async fn simulate_latency(&self, ms: u64) {
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn respond<T>(&self, operation: &str, data: T) -> ApiResponse<T> {
        Metrics::fetch(operation);
        ApiResponse::ok(data, self.clock.now())
    }

    /// Baseline counters with a refreshed timestamp.
    pub async fn fetch_overview(&self) -> ApiResponse<OverviewSnapshot> {
        self.simulate_latency(self.config.latency.fetch_ms).await;

        let mut overview = self.store.read().overview.clone();
        overview.timestamp = self.clock.now();

        debug!(operation = "fetch_overview", "Served overview snapshot");
        self.respond("fetch_overview", overview)
    }

    /// Current node roster, unchanged.
    pub async fn fetch_security_nodes(&self) -> ApiResponse<Vec<SecurityNode>> {
        self.simulate_latency(self.config.latency.fetch_ms).await;

        let nodes = self.store.read().nodes.clone();

        debug!(operation = "fetch_security_nodes", count = nodes.len(), "Served node roster");
        self.respond("fetch_security_nodes", nodes)
    }

    /// Synthesize one new threat, prepend it to the history and return the
    /// whole history (newest first).
    pub async fn fetch_security_threats(&self) -> ApiResponse<Vec<ThreatEvent>> {
        self.simulate_latency(self.config.latency.threats_ms).await;

        let threat = self.synthesize_threat();
        let threats = {
            let mut store = self.store.write();
            store.threats.insert(0, threat.clone());
            store.threats.clone()
        };

        debug!(
            operation = "fetch_security_threats",
            threat_id = %threat.id,
            threat_type = %threat.threat_type,
            severity = %threat.severity,
            count = threats.len(),
            "Synthesized threat"
        );
        self.respond("fetch_security_threats", threats)
    }

    fn synthesize_threat(&self) -> ThreatEvent {
        let mut rng = self.rng.lock();
        let threat_type = *ThreatType::ALL
            .choose(&mut *rng)
            .unwrap_or(&ThreatType::DdosAttempt);
        let severity = *Severity::ALL.choose(&mut *rng).unwrap_or(&Severity::Low);
        let resolved = rng.gen_bool(0.5);
        let auto_recovered = resolved && rng.gen_bool(0.5);
        let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

        ThreatEvent {
            id: id.to_string(),
            threat_type,
            severity,
            detected_at: self.clock.now(),
            resolved,
            auto_recovered,
        }
    }

    /// Proofs whose campaign contains `campaign_filter` (case-insensitive).
    /// `None` returns every proof.
    pub async fn fetch_media_proofs(
        &self,
        campaign_filter: Option<&str>,
    ) -> ApiResponse<Vec<MediaProof>> {
        self.simulate_latency(self.config.latency.fetch_ms).await;

        let proofs = filter_proofs(&self.store.read().media_proofs, campaign_filter);

        debug!(
            operation = "fetch_media_proofs",
            filter = campaign_filter.unwrap_or(""),
            count = proofs.len(),
            "Served media proofs"
        );
        self.respond("fetch_media_proofs", proofs)
    }

    /// Per-service health with latency walked by up to ±10ms inside [20, 150].
    pub async fn fetch_bridge_health(&self) -> ApiResponse<BTreeMap<String, HealthStatus>> {
        self.simulate_latency(self.config.latency.fetch_ms).await;

        let now = self.clock.now();
        let health = {
            let mut rng = self.rng.lock();
            let mut store = self.store.write();
            for status in store.bridge_health.values_mut() {
                status.latency_ms = walk::step(
                    &mut *rng,
                    status.latency_ms,
                    NODE_LATENCY_STEP_MS,
                    NODE_LATENCY_RANGE,
                );
                status.last_sync = now;
            }
            store.bridge_health.clone()
        };

        debug!(operation = "fetch_bridge_health", services = health.len(), "Served bridge health");
        self.respond("fetch_bridge_health", health)
    }

    /// Bridge links with latency walked by up to ±7.5ms inside [30, 120];
    /// each link independently reports `inactive` with 10% probability.
    pub async fn fetch_bridge_flow(&self) -> ApiResponse<Vec<BridgeLink>> {
        self.simulate_latency(self.config.latency.fetch_ms).await;

        let now = self.clock.now();
        let links = {
            let mut rng = self.rng.lock();
            let mut store = self.store.write();
            for link in store.bridge_links.iter_mut() {
                link.latency_ms = walk::step(
                    &mut *rng,
                    link.latency_ms,
                    BRIDGE_FLOW_STEP_MS,
                    BRIDGE_FLOW_LATENCY_RANGE,
                );
                link.status = if rng.gen_bool(LINK_INACTIVE_PROBABILITY) {
                    LinkStatus::Inactive
                } else {
                    LinkStatus::Active
                };
                link.updated_at = now;
            }
            store.bridge_links.clone()
        };

        let inactive = links
            .iter()
            .filter(|l| l.status == LinkStatus::Inactive)
            .count();
        debug!(operation = "fetch_bridge_flow", links = links.len(), inactive, "Served bridge flow");
        self.respond("fetch_bridge_flow", links)
    }

    /// Fabricated on-chain verification: always verified, random block in
    /// `[BLOCK_NUMBER_MIN, BLOCK_NUMBER_MAX)`, explorer link ending in `hash`.
    pub async fn verify_on_chain(&self, hash: &str) -> ApiResponse<VerificationResult> {
        self.simulate_latency(self.config.latency.verify_ms).await;

        let block_number = self
            .rng
            .lock()
            .gen_range(BLOCK_NUMBER_MIN..BLOCK_NUMBER_MAX);
        let explorer_url = format!(
            "{}/tx/{}",
            self.config.explorer_base_url.trim_end_matches('/'),
            hash
        );

        debug!(operation = "verify_on_chain", hash, block_number, "Fabricated verification");
        self.respond(
            "verify_on_chain",
            VerificationResult {
                verified: true,
                hash: hash.to_string(),
                block_number,
                explorer_url,
                timestamp: self.clock.now(),
            },
        )
    }

    /// Health sub-snapshot for export metadata.
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            network_health: self.store.read().overview.network_health,
            uptime: REPORTED_UPTIME_PCT,
            last_sync: self.clock.now(),
        }
    }

    /// Records backing one export type, read without simulated delay or
    /// mutation.
    pub fn snapshot(&self, export_type: ExportType) -> Vec<TelemetryRecord> {
        let store = self.store.read();
        match export_type {
            ExportType::Overview => {
                let mut overview = store.overview.clone();
                overview.timestamp = self.clock.now();
                vec![overview.into()]
            }
            ExportType::Security => store
                .nodes
                .iter()
                .cloned()
                .map(TelemetryRecord::from)
                .chain(store.threats.iter().cloned().map(TelemetryRecord::from))
                .collect(),
            ExportType::Media => store
                .media_proofs
                .iter()
                .cloned()
                .map(TelemetryRecord::from)
                .collect(),
            ExportType::Bridge => store
                .bridge_links
                .iter()
                .cloned()
                .map(TelemetryRecord::from)
                .collect(),
        }
    }

    /// Number of threats in the history.
    pub fn threat_count(&self) -> usize {
        self.store.read().threats.len()
    }
}

impl std::fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.read();
        f.debug_struct("MockGenerator")
            .field("seed", &self.config.seed)
            .field("nodes", &store.nodes.len())
            .field("threats", &store.threats.len())
            .field("media_proofs", &store.media_proofs.len())
            .finish()
    }
}

fn filter_proofs(proofs: &[MediaProof], campaign_filter: Option<&str>) -> Vec<MediaProof> {
    match campaign_filter {
        None => proofs.to_vec(),
        Some(filter) => {
            let needle = filter.to_lowercase();
            proofs
                .iter()
                .filter(|p| p.campaign.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use audit_core::NodeStatus;
    use chrono::{TimeZone, Utc};

    fn test_generator(seed: u64) -> (MockGenerator, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
        ));
        let store = TelemetryStore::fixture(clock.now());
        let generator =
            MockGenerator::with_parts(MockConfig::deterministic(seed), store, clock.clone());
        (generator, clock)
    }

    #[tokio::test]
    async fn test_overview_refreshes_timestamp_only() {
        let (generator, clock) = test_generator(1);
        let before = generator.store.read().overview.clone();

        clock.advance(chrono::Duration::minutes(5));
        let resp = generator.fetch_overview().await;

        assert!(resp.success);
        assert_eq!(resp.data.timestamp, clock.now());
        assert_eq!(resp.data.total_scans, before.total_scans);
        assert_eq!(resp.data.integrity_score, before.integrity_score);
    }

    #[tokio::test]
    async fn test_security_nodes_unchanged() {
        let (generator, _) = test_generator(1);
        let first = generator.fetch_security_nodes().await.data;
        let second = generator.fetch_security_nodes().await.data;
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[tokio::test]
    async fn test_threats_prepend_one_per_call() {
        let (generator, clock) = test_generator(3);
        let prior = generator.store.read().threats.clone();

        let n = 5;
        let mut last = Vec::new();
        for _ in 0..n {
            clock.advance(chrono::Duration::seconds(1));
            last = generator.fetch_security_threats().await.data;
        }

        assert_eq!(last.len(), prior.len() + n);
        // Prior entries keep their relative order behind the new ones.
        assert_eq!(&last[n..], &prior[..]);
        // Newest first.
        for pair in last[..n].windows(2) {
            assert!(pair[0].detected_at > pair[1].detected_at);
        }
        assert_eq!(last[0].detected_at, clock.now());
        assert_eq!(generator.threat_count(), prior.len() + n);
    }

    #[tokio::test]
    async fn test_threats_reproducible_for_seed() {
        let (a, _) = test_generator(99);
        let (b, _) = test_generator(99);
        let ta = a.fetch_security_threats().await.data;
        let tb = b.fetch_security_threats().await.data;
        assert_eq!(ta[0], tb[0]);
    }

    #[tokio::test]
    async fn test_media_filter_case_insensitive() {
        let (generator, _) = test_generator(1);

        let summer = generator.fetch_media_proofs(Some("summer")).await.data;
        let campaigns: Vec<_> = summer.iter().map(|p| p.campaign.as_str()).collect();
        assert_eq!(campaigns, vec!["Summer Campaign 2024", "Endless summer tour"]);
        assert!(!campaigns.contains(&"Winter Promotion"));

        let all = generator.fetch_media_proofs(None).await.data;
        assert_eq!(all.len(), 4);

        let none = generator.fetch_media_proofs(Some("autumn")).await.data;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_bridge_health_bounded_walk() {
        let (generator, clock) = test_generator(11);
        let mut previous = generator.store.read().bridge_health.clone();

        for _ in 0..200 {
            let health = generator.fetch_bridge_health().await.data;
            for (service, status) in &health {
                assert!(NODE_LATENCY_RANGE.contains(status.latency_ms));
                let prior = previous[service].latency_ms;
                assert!((status.latency_ms - prior).abs() <= NODE_LATENCY_STEP_MS + 0.05);
                assert_eq!(status.last_sync, clock.now());
            }
            previous = health;
        }
        assert_eq!(previous["Proof Registry"].status, NodeStatus::Standby);
    }

    #[tokio::test]
    async fn test_bridge_flow_bounded_and_flips() {
        let (generator, _) = test_generator(5);
        let mut saw_inactive = false;
        let mut saw_active = false;

        for _ in 0..200 {
            for link in generator.fetch_bridge_flow().await.data {
                assert!(BRIDGE_FLOW_LATENCY_RANGE.contains(link.latency_ms));
                match link.status {
                    LinkStatus::Inactive => saw_inactive = true,
                    LinkStatus::Active => saw_active = true,
                }
            }
        }
        assert!(saw_inactive && saw_active);
    }

    #[tokio::test]
    async fn test_verify_on_chain() {
        let (generator, _) = test_generator(1);
        for _ in 0..50 {
            let result = generator.verify_on_chain("0xdead").await.data;
            assert!(result.verified);
            assert!((BLOCK_NUMBER_MIN..BLOCK_NUMBER_MAX).contains(&result.block_number));
            assert!(result.explorer_url.ends_with("0xdead"));
            assert!(result.explorer_url.starts_with("https://explorer.example.com/tx/"));
        }
    }

    #[tokio::test]
    async fn test_verify_uses_configured_base_url() {
        let mut config = MockConfig::deterministic(2);
        config.explorer_base_url = "https://scan.test/".to_string();
        let generator = MockGenerator::new(config);
        let result = generator.verify_on_chain("0xbeef").await.data;
        assert_eq!(result.explorer_url, "https://scan.test/tx/0xbeef");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_waits_for_simulated_latency() {
        let mut config = MockConfig::deterministic(1);
        config.latency.fetch_ms = 500;
        let generator = MockGenerator::new(config);

        let start = tokio::time::Instant::now();
        generator.fetch_security_nodes().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let (generator, _) = test_generator(1);
        let before = generator.threat_count();
        let security = generator.snapshot(ExportType::Security);
        assert_eq!(security.len(), 4 + before);
        assert_eq!(generator.threat_count(), before);
        assert_eq!(generator.snapshot(ExportType::Overview).len(), 1);
        assert_eq!(generator.snapshot(ExportType::Bridge).len(), 4);
    }

    #[test]
    fn test_system_info() {
        let (generator, clock) = test_generator(1);
        let info = generator.system_info();
        assert_eq!(info.network_health, 99.2);
        assert_eq!(info.uptime, REPORTED_UPTIME_PCT);
        assert_eq!(info.last_sync, clock.now());
    }
}
