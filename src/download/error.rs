//! Error types for per-attempt file fetches.
//!
//! One attempt either succeeds or produces a [`FetchError`]; the retry loop
//! in the orchestrator decides what happens next. Classification is
//! structural — callers match variants, never message text.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a single download attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, read timeout, mid-stream).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The file endpoint answered with something other than HTTP 200.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that failed.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while streaming to disk or renaming into place.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
