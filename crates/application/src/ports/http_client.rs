//! HTTP client port

use std::future::Future;

use caliper_domain::{ApiRequest, ApiResponse};
use thiserror::Error;

/// Failures raised by an [`HttpClient`] before a response is available.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The request URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// No response arrived within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The server could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body is not JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidBody(String),

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// Keeps the scenario runner independent of a concrete HTTP library.
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the decoded response.
    ///
    /// Non-2xx statuses are responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, or a body that cannot
    /// be decoded.
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, HttpClientError>> + Send;
}
