//! Error types for the generative service layer.

use thiserror::Error;

/// Errors that can occur while talking to a generative text service.
#[derive(Error, Debug)]
pub enum GenAiError {
    /// The configured endpoint is not a usable URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failed to reach the service.
    #[error("connection error: {0}")]
    Connection(String),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}
