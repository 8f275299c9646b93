//! HTTP range-request backend

use crate::Bucket;
use crate::config::HttpBucketConfig;
use crate::error::{BucketError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::RANGE;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Install the ring crypto provider for rustls once per process
///
/// reqwest is built without a bundled provider, so one must be installed
/// before the first client is created.
pub(crate) fn ensure_crypto_provider() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        // Fails only if another provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Bucket backed by an HTTP(S) server supporting range requests
///
/// Objects are fetched from `base_url + "/" + key`.
#[derive(Debug, Clone)]
pub struct HttpBucket {
    client: reqwest::Client,
    base_url: String,
    config: HttpBucketConfig,
}

impl HttpBucket {
    /// Create a bucket rooted at `base_url`
    pub fn new(base_url: impl Into<String>, config: HttpBucketConfig) -> Result<Self> {
        ensure_crypto_provider();
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| BucketError::HttpClientSetup { source })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Active configuration
    pub fn config(&self) -> &HttpBucketConfig {
        &self.config
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl Bucket for HttpBucket {
    async fn read_range(&self, key: &str, offset: u64, length: u64) -> Result<Bytes> {
        if length == 0 {
            return Ok(Bytes::new());
        }
        let end = offset
            .checked_add(length - 1)
            .ok_or(BucketError::InvalidRange { offset, length })?;

        let url = self.object_url(key);
        trace!(url = %url, offset, length, "Range request");

        let response = self
            .client
            .get(&url)
            .header(RANGE, format!("bytes={offset}-{end}"))
            .send()
            .await
            .map_err(|source| BucketError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
            return Err(BucketError::HttpStatus {
                status_code: status.as_u16(),
                url,
            });
        }

        let mut body = response
            .bytes()
            .await
            .map_err(|source| BucketError::Network {
                url: url.clone(),
                source,
            })?;

        // A 200 larger than the range is the whole object: the server ignored
        // the Range header
        if status == StatusCode::OK
            && body.len() as u64 > length
            && let Ok(start) = usize::try_from(offset)
            && let Some(stop) = offset
                .checked_add(length)
                .and_then(|stop| usize::try_from(stop).ok())
            && stop <= body.len()
        {
            debug!(url = %url, "Server ignored Range header, slicing full response");
            body = body.slice(start..stop);
        }

        if body.len() as u64 != length {
            if self.config.strict_length {
                return Err(BucketError::ShortRead {
                    location: url,
                    expected: length,
                    actual: body.len() as u64,
                });
            }
            debug!(
                url = %url,
                expected = length,
                actual = body.len(),
                "Response length differs from requested range"
            );
        }

        Ok(body)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
