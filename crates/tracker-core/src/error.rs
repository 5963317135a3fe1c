//! Error types for the tracker provider
//!
//! This module defines all error types used by the resource plumbing.
//! Errors raised by an API client are carried through [`Error::Client`]
//! without being reclassified.

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by an API client
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for the tracker provider
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configuration field holds a value the mapping cannot use
    #[error("Invalid value for field `{field}`: {message}")]
    InvalidField {
        /// Schema field name
        field: String,
        /// What was wrong with the value
        message: String,
    },

    /// The resource has no identifier recorded yet
    #[error("Resource has no identifier")]
    MissingId,

    /// The recorded identifier cannot be parsed
    #[error("Invalid resource identifier: {0}")]
    InvalidId(String),

    /// No resource kind registered under the given name
    #[error("Unknown resource kind: {0}")]
    UnknownResource(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API client reported a failure
    #[error("API call failed: {0}")]
    Client(#[source] BoxError),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Wrap an API client error, keeping it reachable through `source()`
    pub fn client<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Client(Box::new(err))
    }

    /// Borrow the wrapped client error as a concrete type
    pub fn client_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Client(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct FakeClientError;

    impl std::fmt::Display for FakeClientError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("fake client error")
        }
    }

    impl std::error::Error for FakeClientError {}

    #[test]
    fn client_error_is_reachable_by_downcast() {
        let err = Error::client(FakeClientError);

        assert_eq!(err.client_error::<FakeClientError>(), Some(&FakeClientError));
        assert_eq!(err.to_string(), "API call failed: fake client error");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn non_client_errors_do_not_downcast() {
        let err = Error::MissingId;
        assert!(err.client_error::<FakeClientError>().is_none());
    }
}
