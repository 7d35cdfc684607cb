//! Generic request wrapper.
//!
//! The single place a request failure is intercepted: the underlying error is
//! logged and re-signalled as [`MockError::Request`] with its message
//! embedded. Nothing is retried.

use std::fmt::Display;
use std::future::Future;

use tracing::error;

use audit_telemetry::Metrics;

use crate::error::{MockError, MockResult};

/// Run `request` and wrap any failure.
pub async fn execute<T, E, F, Fut>(operation: &str, request: F) -> MockResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match request().await {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(operation, error = %e, "API request failed");
            Metrics::request_failed(operation);
            Err(MockError::Request {
                message: format!("API request failed: {e}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = execute("ok_op", || async { Ok::<_, String>(41 + 1) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_failure_is_wrapped_with_source_message() {
        let result: MockResult<()> =
            execute("failing_op", || async { Err("connection reset") }).await;

        match result {
            Err(MockError::Request { message }) => {
                assert_eq!(message, "API request failed: connection reset");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wraps_io_errors() {
        let result: MockResult<u8> = execute("io_op", || async {
            Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline elapsed"))
        })
        .await;
        let err = tokio_test::assert_err!(result);
        assert!(err.to_string().contains("deadline elapsed"));
    }

    #[test]
    fn test_wraps_generator_fetch() {
        let generator = crate::MockGenerator::new(crate::MockConfig::deterministic(1));
        let result = tokio_test::block_on(execute("fetch_overview", || async {
            Ok::<_, MockError>(generator.fetch_overview().await)
        }));
        let response = tokio_test::assert_ok!(result);
        assert!(response.success);
    }
}
