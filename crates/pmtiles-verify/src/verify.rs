//! Top-level verification entry points

use crate::cancel::CancellationToken;
use crate::error::{Result, VerifyError};
use crate::verifier::{Verifier, VerifyReport};
use crate::walker::DirectoryWalker;
use pmtiles_bucket::{Bucket, HttpBucketConfig, normalize_bucket_key, open_bucket};
use pmtiles_formats::{HEADER_LEN, Header};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Options for [`verify`]
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Explicit bucket URL; the location is then taken as a key inside it
    pub bucket: Option<String>,

    /// Key prefix inside the bucket, or base directory for local paths
    pub prefix: Option<String>,

    /// HTTP backend settings
    pub http: HttpBucketConfig,

    /// Checked before every archive read
    pub cancellation: Option<CancellationToken>,
}

/// Verify the archive at `location`
///
/// `location` is a local path, an `http(s)://` URL, or a key inside
/// `options.bucket`. The bucket is closed before returning on every path.
pub async fn verify(location: &str, options: &VerifyOptions) -> Result<VerifyReport> {
    let bucket_url = options.bucket.as_deref().unwrap_or("");
    let prefix = options.prefix.as_deref().unwrap_or("");

    let object = normalize_bucket_key(bucket_url, prefix, location).map_err(VerifyError::Location)?;
    debug!(bucket_url = %object.bucket_url, key = %object.key, "Resolved location");

    // Local paths already have the prefix folded into the bucket URL
    let open_prefix = if bucket_url.is_empty() { "" } else { prefix };
    let bucket = open_bucket(&object.bucket_url, open_prefix, &options.http).map_err(|source| {
        VerifyError::Open {
            bucket_url: object.bucket_url.clone(),
            source,
        }
    })?;

    let result = verify_bucket(bucket.as_ref(), &object.key, options.cancellation.as_ref()).await;

    if let Err(e) = bucket.close().await {
        warn!(error = %e, "Failed to close bucket");
    }

    result
}

/// Verify the archive stored under `key` in an already opened bucket
///
/// The bucket is left open.
pub async fn verify_bucket(
    bucket: &dyn Bucket,
    key: &str,
    cancellation: Option<&CancellationToken>,
) -> Result<VerifyReport> {
    let start = Instant::now();

    if cancellation.is_some_and(CancellationToken::is_cancelled) {
        return Err(VerifyError::Cancelled);
    }

    let length = HEADER_LEN as u64;
    let data = bucket
        .read_range(key, 0, length)
        .await
        .map_err(|source| VerifyError::Read {
            key: key.to_string(),
            offset: 0,
            length,
            source,
        })?;
    let header = Header::parse(&data).map_err(VerifyError::Header)?;
    debug!(
        root_offset = header.root_offset,
        root_length = header.root_length,
        clustered = header.clustered,
        internal_compression = %header.internal_compression,
        "Read header"
    );

    let mut walker = DirectoryWalker::new(bucket, key, &header);
    if let Some(token) = cancellation {
        walker = walker.with_cancellation(token);
    }

    let mut verifier = Verifier::new(&header);
    let stats = walker
        .walk(header.root_offset, header.root_length, |entry| {
            verifier.observe(entry);
        })
        .await?;
    let findings = verifier.finish();

    let elapsed = start.elapsed();
    info!(
        findings = findings.len(),
        directories = stats.directories_read,
        tile_entries = stats.tile_entries,
        "Completed verify in {elapsed:?}"
    );

    Ok(VerifyReport {
        findings,
        stats,
        elapsed,
    })
}
