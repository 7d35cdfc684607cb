//! audit-mock - simulated telemetry backend for the audit dashboard.
//!
//! - [`MockGenerator`]: fetch operations over an owned [`TelemetryStore`],
//!   each delayed by a simulated round trip
//! - [`LiveFeed`]: bounded recent-activity feed driven by a scheduled task
//! - [`request::execute`]: the request wrapper that re-signals failures
//!
//! All randomness is drawn from a seedable RNG and all timestamps from an
//! injectable [`Clock`], so a fixed seed and a [`ManualClock`] make every
//! output reproducible.
//!
//! # Usage
//!
//! ```ignore
//! use audit_mock::{MockConfig, MockGenerator};
//!
//! let generator = MockGenerator::new(MockConfig::default());
//! let threats = generator.fetch_security_threats().await;
//! assert!(threats.success);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod live_feed;
pub mod request;
pub mod store;
pub mod walk;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LatencyConfig, LiveFeedConfig, MockConfig, DEFAULT_EXPLORER_BASE_URL};
pub use error::{MockError, MockResult};
pub use generator::MockGenerator;
pub use live_feed::LiveFeed;
pub use store::TelemetryStore;
