//! Local filesystem backend

use crate::Bucket;
use crate::error::{BucketError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::trace;
use url::Url;

/// Upper bound on the up-front buffer allocation for one read
const MAX_PREALLOC: u64 = 1024 * 1024;

/// Bucket backed by a local directory
///
/// Keys are relative paths below the root. A range running past the end of
/// the file returns the bytes that exist.
#[derive(Debug, Clone)]
pub struct FileBucket {
    root: PathBuf,
}

impl FileBucket {
    /// Create a bucket rooted at a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a bucket from a `file://` URL
    pub fn from_url(bucket_url: &str) -> Result<Self> {
        let url = Url::parse(bucket_url)
            .map_err(|e| BucketError::invalid_location(bucket_url, e.to_string()))?;
        if url.scheme() != "file" {
            return Err(BucketError::UnsupportedScheme(url.scheme().to_string()));
        }
        let root = url
            .to_file_path()
            .map_err(|()| BucketError::invalid_location(bucket_url, "not a local path"))?;
        Ok(Self::new(root))
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(BucketError::invalid_location(
                key,
                "key escapes the bucket root",
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Bucket for FileBucket {
    async fn read_range(&self, key: &str, offset: u64, length: u64) -> Result<Bytes> {
        if length == 0 {
            return Ok(Bytes::new());
        }

        let path = self.object_path(key)?;
        trace!(path = %path.display(), offset, length, "File range read");

        let io_error = |source| BucketError::Io {
            path: path.clone(),
            source,
        };

        let mut file = File::open(&path).await.map_err(io_error)?;
        file.seek(SeekFrom::Start(offset)).await.map_err(io_error)?;

        let mut buffer = Vec::with_capacity(length.min(MAX_PREALLOC) as usize);
        file.take(length)
            .read_to_end(&mut buffer)
            .await
            .map_err(io_error)?;

        Ok(Bytes::from(buffer))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
