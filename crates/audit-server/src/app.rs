//! Application wiring and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use audit_dashboard::{run_server, DashboardState};
use audit_export::{DirectorySink, ExportSink};
use audit_mock::{LiveFeed, MockGenerator};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Owns the generator, live feed and export sink for one process.
pub struct Application {
    config: AppConfig,
    generator: Arc<MockGenerator>,
    live_feed: Arc<LiveFeed>,
    export_sink: Arc<dyn ExportSink>,
    shutdown: CancellationToken,
}

impl Application {
    /// Build the application from a validated config.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let generator = Arc::new(MockGenerator::new(config.mock.clone()));
        // Offset so the feed does not replay the generator's draws.
        let feed_seed = config.mock.seed.map(|seed| seed.wrapping_add(1));
        let live_feed = Arc::new(LiveFeed::new(
            config.mock.live_feed.capacity,
            feed_seed,
            generator.clock(),
        ));
        let export_sink: Arc<dyn ExportSink> =
            Arc::new(DirectorySink::new(config.export.output_dir.clone()));

        Ok(Self {
            config,
            generator,
            live_feed,
            export_sink,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Token that stops every task spawned by [`Application::run`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// State shared with the dashboard handlers.
    pub fn dashboard_state(&self) -> DashboardState {
        DashboardState::new(
            self.generator.clone(),
            self.live_feed.clone(),
            self.export_sink.clone(),
        )
    }

    /// Run until ctrl-c or until the shutdown token is cancelled.
    pub async fn run(self) -> AppResult<()> {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Run until `signal` resolves or the shutdown token is cancelled.
    ///
    /// Spawned tasks are always cancelled and joined before a signal error
    /// is returned.
    pub async fn run_until<S>(self, signal: S) -> AppResult<()>
    where
        S: std::future::Future<Output = std::io::Result<()>>,
    {
        info!(
            explorer = %self.config.mock.explorer_base_url,
            seeded = self.config.mock.seed.is_some(),
            output_dir = %self.config.export.output_dir,
            "Starting application"
        );

        let feed_interval = Duration::from_millis(self.config.mock.live_feed.interval_ms);
        let feed_handle = self
            .live_feed
            .clone()
            .spawn(feed_interval, self.shutdown.clone());

        let server_handle = if self.config.dashboard.enabled {
            let state = self.dashboard_state();
            let config = self.config.dashboard.clone();
            let shutdown = self.shutdown.clone();
            Some(tokio::spawn(async move {
                run_server(state, config, shutdown)
                    .await
                    .map_err(|e| AppError::Server(e.to_string()))
            }))
        } else {
            info!("Dashboard disabled");
            None
        };

        let signal = tokio::select! {
            _ = self.shutdown.cancelled() => Ok(()),
            result = signal => result,
        };
        match &signal {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!(error = %e, "Waiting for shutdown signal failed"),
        }
        self.shutdown.cancel();

        if let Some(handle) = server_handle {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "Dashboard server failed");
                    return Err(e);
                }
                Err(e) => return Err(AppError::Server(format!("Dashboard task panicked: {e}"))),
            }
        }
        if let Err(e) = feed_handle.await {
            error!(error = %e, "Live feed task failed");
        }

        signal?;
        info!(
            threats = self.generator.threat_count(),
            feed_entries = self.live_feed.len(),
            "Shutting down"
        );
        Ok(())
    }
}
