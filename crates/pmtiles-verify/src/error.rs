//! Error types for verification

use pmtiles_bucket::BucketError;
use pmtiles_formats::FormatError;
use thiserror::Error;

/// Failures that stop a verification run
///
/// Structural problems with an archive are not errors; they are reported as
/// [`Finding`](crate::Finding)s. These variants cover the cases where the
/// tree cannot be walked at all.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The location string could not be resolved
    #[error("Invalid location: {0}")]
    Location(#[source] BucketError),

    /// The storage backend could not be opened
    #[error("Failed to open bucket for {bucket_url}: {source}")]
    Open {
        /// Resolved bucket URL
        bucket_url: String,
        /// Backend error
        #[source]
        source: BucketError,
    },

    /// A range read failed
    #[error("Failed to read {key} at offset {offset} (length {length}): {source}")]
    Read {
        /// Object key
        key: String,
        /// Range start
        offset: u64,
        /// Range length
        length: u64,
        /// Backend error
        #[source]
        source: BucketError,
    },

    /// The header could not be decoded
    #[error("Failed to decode header: {0}")]
    Header(#[source] FormatError),

    /// A directory node could not be decoded
    #[error("Failed to decode directory at offset {offset} (length {length}): {source}")]
    Directory {
        /// Absolute offset of the directory node
        offset: u64,
        /// Length of the directory node
        length: u64,
        /// Decoding error
        #[source]
        source: FormatError,
    },

    /// The caller cancelled the run
    #[error("Verification cancelled")]
    Cancelled,
}

/// Result type for verification
pub type Result<T> = std::result::Result<T, VerifyError>;
