//! Error types for the `MultIA` client.
//!
//! [`Error`] covers every failure mode of a facade call: transport problems,
//! non-success HTTP statuses, responses that do not match the expected shape,
//! local file access and caller-input validation.

use std::path::{Path, PathBuf};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, body read) or
    /// request body encoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, or the error message extracted from it.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Expected {expected}: {source}")]
    Decode {
        /// Description of the expected body.
        expected: &'static str,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// Local file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Output path does not carry the extension required by the payload.
    #[error("Cannot save to {}: {expected}", path.display())]
    InvalidOutputPath {
        /// The rejected path.
        path: PathBuf,
        /// What the path should look like.
        expected: String,
    },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a decode error.
    #[must_use]
    pub const fn decode(expected: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { expected, source }
    }

    /// Create an I/O error bound to a path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an invalid output path error.
    #[must_use]
    pub fn invalid_output_path(path: impl AsRef<Path>, expected: impl Into<String>) -> Self {
        Self::InvalidOutputPath {
            path: path.as_ref().to_path_buf(),
            expected: expected.into(),
        }
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Check whether the error came from the transport or the server status.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpStatus { .. })
    }
}
