//! Error types for optsync-core

use thiserror::Error;

/// Result type alias using optsync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Transport-level errors raised while talking to an option store.
///
/// A server that answers with `success: false` is not an error at this level;
/// the envelope is handed back and the caller decides what to surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Client configuration is unusable
    #[error("Invalid client configuration: {0}")]
    InvalidConfiguration(String),

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON envelope
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status and no usable envelope
    #[error("Option API error: {0}")]
    Status(String),
}
