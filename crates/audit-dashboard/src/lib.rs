//! audit-dashboard - HTTP and WebSocket surface for the audit dashboard.
//!
//! - REST endpoints wrapping every generator fetch in the `ApiResponse` envelope
//! - Export downloads (`GET /api/export/{type}?format=`) and server-side saves
//!   through an [`audit_export::ExportSink`] (`POST`)
//! - WebSocket live activity feed
//! - Prometheus text metrics
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    audit-server process                      │
//! │                                                              │
//! │  ┌────────────────┐   ┌──────────────┐   ┌──────────────┐    │
//! │  │ MockGenerator  │   │   LiveFeed   │   │  ExportSink  │    │
//! │  │   (Arc<>)      │   │   (Arc<>)    │   │   (Arc<>)    │    │
//! │  └───────┬────────┘   └──────┬───────┘   └──────┬───────┘    │
//! │          └───────────────────┼──────────────────┘            │
//! │                              ▼                               │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                    DashboardState                      │  │
//! │  └───────────────────────────┬────────────────────────────┘  │
//! │                              │                               │
//! │  ┌───────────────────────────┼────────────────────────────┐  │
//! │  │  axum HTTP Server                                      │  │
//! │  │  GET  /api/...            → ApiResponse JSON           │  │
//! │  │  GET  /api/export/{type}  → attachment                 │  │
//! │  │  POST /api/export/{type}  → ExportSink                 │  │
//! │  │  GET  /ws                 → live activity              │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod broadcast;
mod config;
mod server;
mod state;
mod types;

pub use config::DashboardConfig;
pub use server::{create_router, run_server, AppState};
pub use state::DashboardState;
pub use types::{DashboardMessage, ExportQuery, ExportReceipt, MediaQuery};
