//! Byte-range storage backends for PMTiles archives
//!
//! An archive is read entirely through `read_range(key, offset, length)`
//! calls. This crate provides the [`Bucket`] trait and two backends:
//!
//! - [`HttpBucket`]: `http://` and `https://` servers via `Range` requests
//! - [`FileBucket`]: local directories addressed by `file://` URLs
//!
//! [`PrefixedBucket`] wraps either one to read keys from below a fixed
//! prefix, and [`normalize_bucket_key`] turns a user-supplied location
//! (URL or path) into a bucket URL plus key.
//!
//! # Example
//!
//! ```rust,no_run
//! use pmtiles_bucket::{HttpBucketConfig, normalize_bucket_key, open_bucket};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let location = normalize_bucket_key("", "", "https://example.com/tiles/world.pmtiles")?;
//! let bucket = open_bucket(&location.bucket_url, "", &HttpBucketConfig::default())?;
//! let header = bucket.read_range(&location.key, 0, 127).await?;
//! bucket.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod location;
pub mod prefixed;

pub use config::HttpBucketConfig;
pub use error::{BucketError, ErrorKind, Result};
pub use file::FileBucket;
pub use http::HttpBucket;
pub use location::{ObjectLocation, normalize_bucket_key};
pub use prefixed::PrefixedBucket;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use tracing::debug;
use url::Url;

/// Random-access reader over a set of keyed objects
#[async_trait]
pub trait Bucket: Send + Sync + fmt::Debug {
    /// Read `length` bytes of `key` starting at `offset`
    ///
    /// A zero `length` returns an empty buffer without any I/O.
    async fn read_range(&self, key: &str, offset: u64, length: u64) -> Result<Bytes>;

    /// Release backend resources
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl<B: Bucket + ?Sized> Bucket for Box<B> {
    async fn read_range(&self, key: &str, offset: u64, length: u64) -> Result<Bytes> {
        (**self).read_range(key, offset, length).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

/// Open the backend for a bucket URL
///
/// `http`/`https` URLs open an [`HttpBucket`] and `file` URLs a
/// [`FileBucket`]. Any other scheme fails with
/// [`BucketError::UnsupportedScheme`]. A non-trivial `prefix` wraps the
/// result in a [`PrefixedBucket`].
pub fn open_bucket(
    bucket_url: &str,
    prefix: &str,
    config: &HttpBucketConfig,
) -> Result<Box<dyn Bucket>> {
    let url = Url::parse(bucket_url)
        .map_err(|e| BucketError::invalid_location(bucket_url, e.to_string()))?;

    let bucket: Box<dyn Bucket> = match url.scheme() {
        "http" | "https" => Box::new(HttpBucket::new(bucket_url, config.clone())?),
        "file" => Box::new(FileBucket::from_url(bucket_url)?),
        other => return Err(BucketError::UnsupportedScheme(other.to_string())),
    };
    debug!(bucket_url, scheme = url.scheme(), "Opened bucket");

    if location::is_trivial_prefix(prefix) {
        Ok(bucket)
    } else {
        debug!(prefix, "Applying bucket prefix");
        Ok(Box::new(PrefixedBucket::new(bucket, prefix)))
    }
}
