//! Generator error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    /// A request failed; `message` embeds the underlying error.
    #[error("{message}")]
    Request { message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type MockResult<T> = Result<T, MockError>;
