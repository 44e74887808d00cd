//! Error types for the completion layer.

use thiserror::Error;

/// Errors that can occur while talking to a completion service.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Failed to construct the HTTP client.
    #[error("failed to create client: {0}")]
    ClientSetup(String),

    /// Could not reach the service.
    #[error("could not connect to {0}")]
    Connection(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Transport-level failure other than connect/timeout.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to read response: {0}")]
    ResponseParsing(String),

    /// The response carried no completion text.
    #[error("service returned no completion")]
    EmptyCompletion,
}
