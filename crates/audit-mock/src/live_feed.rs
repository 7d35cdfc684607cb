//! Live activity feed.
//!
//! A fixed-capacity, drop-oldest buffer of synthetic activity entries fed by
//! a scheduled task. Each new entry is also published on a broadcast channel.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use audit_core::{ActivityEntry, ActivityKind, ThreatType};

use crate::clock::Clock;

const CAMPAIGNS: [&str; 4] = [
    "Summer Campaign 2024",
    "Winter Promotion",
    "Endless summer tour",
    "Back to School",
];

/// Broadcast buffer for live subscribers.
const CHANNEL_CAPACITY: usize = 32;

/// Bounded recent-activity feed.
pub struct LiveFeed {
    entries: RwLock<VecDeque<ActivityEntry>>,
    capacity: usize,
    rng: Mutex<StdRng>,
    clock: Arc<dyn Clock>,
    tx: broadcast::Sender<ActivityEntry>,
}

impl LiveFeed {
    /// Create a feed holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, seed: Option<u64>, clock: Arc<dyn Clock>) -> Self {
        let capacity = capacity.max(1);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            rng: Mutex::new(rng),
            clock,
            tx,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Subscribe to entries pushed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEntry> {
        self.tx.subscribe()
    }

    /// Insert an entry, evicting the oldest when full.
    pub fn push(&self, entry: ActivityEntry) {
        {
            let mut entries = self.entries.write();
            entries.push_back(entry.clone());
            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }
        // No receivers is normal when nobody is watching.
        if let Ok(n) = self.tx.send(entry) {
            trace!(receivers = n, "Activity entry published");
        }
    }

    /// Retained entries, newest first.
    pub fn recent(&self) -> Vec<ActivityEntry> {
        self.entries.read().iter().rev().cloned().collect()
    }

    /// Synthesize and push one entry.
    pub fn tick(&self) -> ActivityEntry {
        let entry = self.synthesize();
        debug!(kind = ?entry.kind, id = %entry.id, "Live feed tick");
        self.push(entry.clone());
        entry
    }

    fn synthesize(&self) -> ActivityEntry {
        let mut rng = self.rng.lock();
        let kind = *ActivityKind::ALL
            .choose(&mut *rng)
            .unwrap_or(&ActivityKind::Scan);
        let message = match kind {
            ActivityKind::Scan => {
                format!("Audit scan completed for document #{}", rng.gen_range(1000..10000))
            }
            ActivityKind::Verification => {
                format!("Proof 0x{:08x} verified on-chain", rng.gen::<u32>())
            }
            ActivityKind::Release => {
                let campaign = CAMPAIGNS.choose(&mut *rng).copied().unwrap_or("campaign");
                format!("Released ${} to {}", rng.gen_range(100..5000), campaign)
            }
            ActivityKind::Alert => {
                let threat = ThreatType::ALL
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or(ThreatType::DdosAttempt);
                format!("{threat} detected and contained")
            }
        };
        let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

        ActivityEntry {
            id: id.to_string(),
            kind,
            message,
            timestamp: self.clock.now(),
        }
    }

    /// Tick every `interval` until `shutdown` is cancelled.
    pub fn spawn(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            info!(interval_ms = interval.as_millis() as u64, "Live feed started");

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Live feed stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.tick();
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for LiveFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveFeed")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
