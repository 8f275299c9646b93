//! Key-prefixing wrapper

use crate::Bucket;
use crate::error::Result;
use crate::location::{clean_prefix, is_trivial_prefix};
use async_trait::async_trait;
use bytes::Bytes;

/// Wraps a bucket so every key is read from below a fixed prefix
#[derive(Debug)]
pub struct PrefixedBucket<B> {
    inner: B,
    prefix: String,
}

impl<B: Bucket> PrefixedBucket<B> {
    /// Wrap `inner`, cleaning `prefix` first
    pub fn new(inner: B, prefix: &str) -> Self {
        let prefix = if is_trivial_prefix(prefix) {
            String::new()
        } else {
            format!("{}/", clean_prefix(prefix))
        };
        Self { inner, prefix }
    }

    /// Prefix prepended to keys, with trailing slash
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The wrapped bucket
    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

#[async_trait]
impl<B: Bucket> Bucket for PrefixedBucket<B> {
    async fn read_range(&self, key: &str, offset: u64, length: u64) -> Result<Bytes> {
        self.inner
            .read_range(&self.prefixed_key(key), offset, length)
            .await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }
}
