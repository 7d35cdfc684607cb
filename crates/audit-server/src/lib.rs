//! Audit dashboard service.
//!
//! Wires the mock telemetry generator, the live activity feed, the export
//! sink and the dashboard server together, driven by [`AppConfig`].

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
