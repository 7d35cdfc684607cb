//! WebSocket broadcast functionality.
//!
//! Forwards every new live-feed entry, serialized once, to the channel all
//! WebSocket clients listen on.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::state::DashboardState;
use crate::types::DashboardMessage;

/// Run the broadcaster task until `shutdown` is cancelled or the feed closes.
pub async fn run_broadcaster(
    state: DashboardState,
    tx: broadcast::Sender<String>,
    shutdown: CancellationToken,
) {
    let mut feed_rx = state.live_feed().subscribe();

    loop {
        let entry = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = feed_rx.recv() => match result {
                Ok(entry) => entry,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Broadcaster lagged behind live feed");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Live feed closed");
                    break;
                }
            },
        };

        match serde_json::to_string(&DashboardMessage::Activity(entry)) {
            Ok(json) => match tx.send(json) {
                Ok(n) => trace!(receivers = n, "Broadcast activity sent"),
                // No receivers - normal when no clients are connected
                Err(_) => trace!("No WebSocket receivers connected"),
            },
            Err(e) => debug!(error = %e, "Failed to serialize activity"),
        }
    }
}
