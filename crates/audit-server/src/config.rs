//! Application configuration.
//!
//! Loaded from a TOML file and overlaid with `AUDIT_`-prefixed environment
//! variables, `__` separating nested keys
//! (e.g. `AUDIT_MOCK__EXPLORER_BASE_URL`).

use audit_dashboard::DashboardConfig;
use audit_mock::MockConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Export sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory server-side saves are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "./exports".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generator and live feed configuration.
    #[serde(default)]
    pub mock: MockConfig,
    /// Dashboard server configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Export sink configuration.
    #[serde(default)]
    pub export: ExportConfig,
    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from `path` (a missing file yields defaults), then apply
    /// environment overrides.
    pub fn load(path: &str) -> AppResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix("AUDIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("Failed to load config: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> AppResult<()> {
        self.mock.validate()?;
        if self.export.output_dir.trim().is_empty() {
            return Err(AppError::Config("export.output_dir must not be empty".to_string()));
        }
        Ok(())
    }
}
