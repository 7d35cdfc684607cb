//! Dashboard state management.
//!
//! DashboardState bundles the generator, the live feed and the sink used
//! for server-side export saves.

use std::sync::Arc;

use audit_core::{ExportPayload, ExportType};
use audit_export::ExportSink;
use audit_mock::{LiveFeed, MockGenerator};

use crate::types::DashboardMessage;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct DashboardState {
    generator: Arc<MockGenerator>,
    live_feed: Arc<LiveFeed>,
    export_sink: Arc<dyn ExportSink>,
}

impl DashboardState {
    pub fn new(
        generator: Arc<MockGenerator>,
        live_feed: Arc<LiveFeed>,
        export_sink: Arc<dyn ExportSink>,
    ) -> Self {
        Self {
            generator,
            live_feed,
            export_sink,
        }
    }

    pub fn generator(&self) -> &MockGenerator {
        &self.generator
    }

    pub fn live_feed(&self) -> &Arc<LiveFeed> {
        &self.live_feed
    }

    pub fn export_sink(&self) -> &dyn ExportSink {
        self.export_sink.as_ref()
    }

    /// Build an export payload from the generator's current records.
    pub fn build_payload(&self, export_type: ExportType) -> ExportPayload {
        let generator = &self.generator;
        ExportPayload::new(
            export_type,
            generator.snapshot(export_type),
            generator.config().agent_id.clone(),
            generator.system_info(),
            generator.clock().now(),
        )
    }

    /// Initial message for a new WebSocket client.
    pub fn activity_snapshot(&self) -> DashboardMessage {
        DashboardMessage::Snapshot {
            timestamp: self.generator.clock().now(),
            entries: self.live_feed.recent(),
        }
    }
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("generator", &self.generator)
            .field("live_feed", &self.live_feed)
            .finish()
    }
}
