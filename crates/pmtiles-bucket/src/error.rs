//! Error types for storage backends

use std::path::PathBuf;
use thiserror::Error;

/// Backend-neutral classification of a [`BucketError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The object does not exist
    NotFound,
    /// The server answered with an unexpected status
    Status,
    /// Connection, TLS, timeout or local I/O failure
    Transport,
    /// Fewer bytes than requested were returned
    ShortRead,
    /// Requested range cannot be expressed
    InvalidRange,
    /// The location could not be resolved to a bucket and key
    InvalidLocation,
    /// The location names a backend this crate does not provide
    Unsupported,
}

/// Errors that can occur while reading from a bucket
#[derive(Debug, Error)]
pub enum BucketError {
    /// HTTP client could not be built
    #[error("HTTP client setup failed: {source}")]
    HttpClientSetup {
        /// The underlying client setup error
        #[source]
        source: reqwest::Error,
    },

    /// Network request failed
    #[error("Network request to {url} failed: {source}")]
    Network {
        /// Requested URL
        url: String,
        /// The underlying network error
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request returned a status other than 200 or 206
    #[error("HTTP request failed with status {status_code} for URL: {url}")]
    HttpStatus {
        /// HTTP status code returned by the server
        status_code: u16,
        /// The URL that generated the error
        url: String,
    },

    /// Response body length differs from the requested length
    #[error("Short read from {location}: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// URL or path read from
        location: String,
        /// Requested length
        expected: u64,
        /// Bytes received
        actual: u64,
    },

    /// Range end overflows `u64`
    #[error("Invalid range: offset {offset}, length {length}")]
    InvalidRange {
        /// Range start
        offset: u64,
        /// Range length
        length: u64,
    },

    /// Local file access failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Location string could not be resolved
    #[error("Invalid location '{location}': {reason}")]
    InvalidLocation {
        /// Location as given
        location: String,
        /// What is wrong with it
        reason: String,
    },

    /// Bucket URL scheme has no backend
    #[error("Unsupported bucket scheme: {0}")]
    UnsupportedScheme(String),
}

impl BucketError {
    /// Classify this error without exposing backend types
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpStatus { status_code, .. } if *status_code == 404 => ErrorKind::NotFound,
            Self::HttpStatus { .. } => ErrorKind::Status,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            Self::HttpClientSetup { .. } | Self::Network { .. } | Self::Io { .. } => {
                ErrorKind::Transport
            }
            Self::ShortRead { .. } => ErrorKind::ShortRead,
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
            Self::InvalidLocation { .. } => ErrorKind::InvalidLocation,
            Self::UnsupportedScheme(_) => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn invalid_location(location: &str, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for bucket operations
pub type Result<T> = std::result::Result<T, BucketError>;
