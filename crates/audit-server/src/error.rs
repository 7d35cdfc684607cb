//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generator error: {0}")]
    Mock(#[from] audit_mock::MockError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] audit_telemetry::TelemetryError),

    #[error("Dashboard server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
