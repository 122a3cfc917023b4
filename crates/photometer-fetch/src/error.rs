//! Error types for photometer-fetch.

use std::path::PathBuf;

use thiserror::Error;

/// A failure below the level of a well-formed service response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read image {path}: {message}")]
    ImageRead { path: PathBuf, message: String },
}

impl TransportError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// An unreadable local image fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::ImageRead { .. })
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// Why the processed image could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid processed image name {0:?}")]
    InvalidFilename(String),

    #[error("processed image request returned status {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to store processed image at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FetchError>;
