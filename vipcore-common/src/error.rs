//! Transport-level error types.
//!
//! A [`TransportError`] means the request never produced a usable response:
//! the connection failed, the service kept answering with a retryable status
//! until the retry budget ran out, or the request could not be built at all.
//! Errors reported by the service itself live in the client crate.

use thiserror::Error;

/// Failure to obtain a response from the remote service.
///
/// Each error is classified as retryable or not, which drives
/// [`RetryPolicy`](crate::RetryPolicy).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request did not complete (connect, timeout or body read failure)
    #[error("POST /{path} failed: {source}")]
    Request {
        /// Relative path of the request
        path: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a retryable status on every attempt
    #[error("POST /{path} answered with status {status}")]
    ServerError {
        /// Relative path of the request
        path: String,
        /// Last HTTP status received
        status: u16,
    },

    /// The request body could not be encoded
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The endpoint URL could not be built from the base URL and path
    #[error("Invalid URL for path {path}: {reason}")]
    InvalidUrl {
        /// Relative path of the request
        path: String,
        /// Parse failure description
        reason: String,
    },

    /// The HTTP client could not be created
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The transport was closed before the call
    #[error("Transport is closed")]
    Closed,
}

impl TransportError {
    /// Check if this error is retryable.
    ///
    /// Only incomplete requests and retryable server statuses are transient;
    /// everything else fails the same way on every attempt.
    ///
    /// # Examples
    ///
    /// ```
    /// use vipcore_common::TransportError;
    ///
    /// let err = TransportError::server_error("1.0/api/libraryrules", 502);
    /// assert!(err.is_retryable());
    /// assert!(!TransportError::Closed.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::ServerError { .. })
    }

    /// Create a request error for the given path.
    #[must_use]
    pub fn request(path: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            path: path.into(),
            source,
        }
    }

    /// Create a server error for the given path and status.
    #[must_use]
    pub fn server_error(path: impl Into<String>, status: u16) -> Self {
        Self::ServerError {
            path: path.into(),
            status,
        }
    }

    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
