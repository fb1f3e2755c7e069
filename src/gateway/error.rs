//! Gateway error definitions.

use thiserror::Error;

/// Errors surfaced by a [`Gateway`](crate::gateway::Gateway) call.
///
/// The coordinator never inspects these; they are passed through unchanged.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("custody API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected record shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Backend unreachable for a reason not covered above.
    #[error("custody API unavailable: {0}")]
    Unavailable(String),
}

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;
