//! Error type of the tracker API client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one API call
///
/// `Request` is raised before any network I/O; every other variant means
/// the call was attempted. Nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request could not be built (bad path, unserializable body)
    #[error("Failed to build request: {0}")]
    Request(String),

    /// The HTTP round trip failed (connect, TLS, timeout, truncated body)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status
    #[error("Tracker API returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error text reported by the service
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl Error {
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// HTTP status reported by the service, if the call got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
