//! Error types for the bridge adapter.

use thiserror::Error;

/// Errors that can occur when talking to the Timebox bridge.
///
/// Only [`Error::Config`] ever reaches the caller as an error: it is raised
/// when the adapter fails to initialize. Everything else is caught at the
/// dispatch boundary, logged with the offending field and value, and
/// collapsed into a `false` send result.
#[derive(Debug, Error)]
pub enum Error {
    /// Bridge unreachable or configuration invalid at startup
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or incomplete notification payload
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The bridge (or an image host) returned an error status code
    #[error("server returned status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Image file unreadable, or outside the configured image directory
    #[error("file access error: {0}")]
    FileAccess(String),

    /// Malformed timezone offset or brightness value
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}
