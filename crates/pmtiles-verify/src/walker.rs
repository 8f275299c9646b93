//! Depth-first traversal of the directory tree
//!
//! Nodes are read lazily through the bucket, one range read per node. The
//! walk keeps an explicit stack of partly consumed nodes, so tile entries
//! come out in the same order a recursive walk would produce and depth is
//! not limited by the call stack.
//!
//! Every node is read at most once. A leaf pointer that leads back to a node
//! already read (itself, an ancestor or a sibling) aborts the walk instead of
//! looping.

use crate::cancel::CancellationToken;
use crate::error::{Result, VerifyError};
use pmtiles_bucket::Bucket;
use pmtiles_formats::{Compression, Directory, Entry, FormatError, Header};
use std::collections::HashSet;
use tracing::trace;

/// Counters collected during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directory nodes read, root included
    pub directories_read: u64,
    /// Tile entries passed to the visitor
    pub tile_entries: u64,
    /// Deepest level reached, the root being level 1
    pub max_depth: usize,
}

/// Walks the directory tree of one archive
#[derive(Debug)]
pub struct DirectoryWalker<'a> {
    bucket: &'a dyn Bucket,
    key: &'a str,
    leaf_directory_offset: u64,
    internal_compression: Compression,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> DirectoryWalker<'a> {
    /// Create a walker for the archive at `key`
    pub fn new(bucket: &'a dyn Bucket, key: &'a str, header: &Header) -> Self {
        Self {
            bucket,
            key,
            leaf_directory_offset: header.leaf_directory_offset,
            internal_compression: header.internal_compression,
            cancellation: None,
        }
    }

    /// Abort with [`VerifyError::Cancelled`] once `token` fires
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Visit every tile entry below the directory at `root_offset`
    ///
    /// Leaf pointers are followed, never passed to `visit`.
    pub async fn walk<F>(
        &self,
        root_offset: u64,
        root_length: u64,
        mut visit: F,
    ) -> Result<WalkStats>
    where
        F: FnMut(&Entry),
    {
        let mut stats = WalkStats::default();

        let mut seen = HashSet::from([(root_offset, root_length)]);
        let root = self.read_directory(root_offset, root_length).await?;
        stats.directories_read = 1;
        stats.max_depth = 1;

        let mut stack = vec![root.into_iter()];
        while let Some(node) = stack.last_mut() {
            let Some(entry) = node.next() else {
                stack.pop();
                continue;
            };

            if entry.is_leaf() {
                let length = u64::from(entry.length);
                let offset = self
                    .leaf_directory_offset
                    .checked_add(entry.offset)
                    .ok_or(VerifyError::Directory {
                        offset: entry.offset,
                        length,
                        source: FormatError::ValueOutOfRange {
                            field: "leaf offset",
                            value: entry.offset,
                        },
                    })?;

                if !seen.insert((offset, length)) {
                    return Err(VerifyError::Directory {
                        offset,
                        length,
                        source: FormatError::RepeatedDirectory { offset, length },
                    });
                }

                let children = self.read_directory(offset, length).await?;
                stats.directories_read += 1;
                stack.push(children.into_iter());
                stats.max_depth = stats.max_depth.max(stack.len());
            } else {
                stats.tile_entries += 1;
                visit(&entry);
            }
        }

        Ok(stats)
    }

    async fn read_directory(&self, offset: u64, length: u64) -> Result<Vec<Entry>> {
        if self.cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(VerifyError::Cancelled);
        }

        let data = self
            .bucket
            .read_range(self.key, offset, length)
            .await
            .map_err(|source| VerifyError::Read {
                key: self.key.to_string(),
                offset,
                length,
                source,
            })?;

        let directory = Directory::parse(&data, self.internal_compression).map_err(|source| {
            VerifyError::Directory {
                offset,
                length,
                source,
            }
        })?;
        trace!(offset, length, entries = directory.len(), "Read directory");

        Ok(directory.entries)
    }
}
