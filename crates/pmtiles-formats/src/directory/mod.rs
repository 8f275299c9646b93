//! Directory nodes
//!
//! A directory is a column-oriented list of [`Entry`] values compressed with
//! the header's internal compression. Once decompressed the layout is:
//!
//! - varint entry count `n`
//! - `n` tile ID deltas (each ID adds to the previous one)
//! - `n` run lengths
//! - `n` lengths
//! - `n` offsets, stored as `offset + 1`, or `0` when the entry starts right
//!   where the previous one ends
//!
//! Decoding is pure: leaf pointers are returned as-is and it is up to the
//! caller to fetch and decode the leaf.
//!
//! Decoding is strict about the node boundary: bytes left over after the
//! offset column are rejected with [`FormatError::TrailingData`] rather than
//! ignored, so padding or a wrong directory length is caught at the node
//! that carries it.
//!
//! ```rust
//! use pmtiles_formats::compression::Compression;
//! use pmtiles_formats::directory::{Directory, Entry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Directory::new(vec![
//!     Entry::new(0, 0, 100, 1),
//!     Entry::new(1, 100, 80, 3),
//! ]);
//! let data = directory.build(Compression::Gzip)?;
//! let parsed = Directory::parse(&data, Compression::Gzip)?;
//! assert_eq!(parsed.find_tile(3), Some(&Entry::new(1, 100, 80, 3)));
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod varint;

pub use entry::Entry;

use crate::compression::{Compression, compress, decompress};
use crate::error::{FormatError, Result};
use varint::{read_varint, write_varint};

/// A decoded directory node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    /// Entries in ascending tile ID order
    pub entries: Vec<Entry>,
}

impl Directory {
    /// Wrap a list of entries
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Decompress and decode a directory node
    pub fn parse(data: &[u8], compression: Compression) -> Result<Self> {
        let raw = decompress(data, compression)?;
        Ok(Self::new(decode_entries(&raw)?))
    }

    /// Encode and compress this directory node
    pub fn build(&self, compression: Compression) -> Result<Vec<u8>> {
        compress(&encode_entries(&self.entries), compression)
    }

    /// Find the entry answering for `tile_id`
    ///
    /// Returns the covering tile entry, or the leaf pointer whose subtree
    /// would contain the tile.
    pub fn find_tile(&self, tile_id: u64) -> Option<&Entry> {
        find_tile(&self.entries, tile_id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode the uncompressed column layout into entries
pub fn decode_entries(data: &[u8]) -> Result<Vec<Entry>> {
    let mut pos = 0usize;
    let count = read_varint(data, &mut pos)?;

    // Every entry needs at least four bytes, which bounds the allocation
    let capacity = usize::try_from(count).unwrap_or(usize::MAX).min(data.len() / 4);
    let mut entries: Vec<Entry> = Vec::with_capacity(capacity);

    let mut last_id = 0u64;
    for _ in 0..count {
        let delta = read_varint(data, &mut pos)?;
        last_id = last_id
            .checked_add(delta)
            .ok_or(FormatError::ValueOutOfRange {
                field: "tile_id",
                value: delta,
            })?;
        entries.push(Entry::new(last_id, 0, 0, 0));
    }

    for entry in &mut entries {
        entry.run_length = read_u32(data, &mut pos, "run_length")?;
    }

    for entry in &mut entries {
        entry.length = read_u32(data, &mut pos, "length")?;
    }

    for i in 0..entries.len() {
        let value = read_varint(data, &mut pos)?;
        entries[i].offset = if value == 0 && i > 0 {
            entries[i - 1]
                .end_offset()
                .ok_or(FormatError::ValueOutOfRange {
                    field: "offset",
                    value: entries[i - 1].offset,
                })?
        } else {
            // Entry 0 always stores offset + 1, so 0 there is malformed
            value.checked_sub(1).ok_or(FormatError::ValueOutOfRange {
                field: "offset",
                value,
            })?
        };
    }

    if pos != data.len() {
        return Err(FormatError::TrailingData(data.len() - pos));
    }

    Ok(entries)
}

/// Encode entries into the uncompressed column layout
pub fn encode_entries(entries: &[Entry]) -> Vec<u8> {
    let mut data = Vec::with_capacity(entries.len() * 8 + 1);
    write_varint(entries.len() as u64, &mut data);

    let mut last_id = 0u64;
    for entry in entries {
        write_varint(entry.tile_id.wrapping_sub(last_id), &mut data);
        last_id = entry.tile_id;
    }

    for entry in entries {
        write_varint(u64::from(entry.run_length), &mut data);
    }

    for entry in entries {
        write_varint(u64::from(entry.length), &mut data);
    }

    for (i, entry) in entries.iter().enumerate() {
        let contiguous = i > 0 && entries[i - 1].end_offset() == Some(entry.offset);
        if contiguous {
            write_varint(0, &mut data);
        } else {
            write_varint(entry.offset.wrapping_add(1), &mut data);
        }
    }

    data
}

/// Binary search for the entry answering for `tile_id`
pub fn find_tile(entries: &[Entry], tile_id: u64) -> Option<&Entry> {
    let idx = entries.partition_point(|e| e.tile_id <= tile_id);
    let candidate = entries.get(idx.checked_sub(1)?)?;

    if candidate.is_leaf() || candidate.covers(tile_id) {
        Some(candidate)
    } else {
        None
    }
}

fn read_u32(data: &[u8], pos: &mut usize, field: &'static str) -> Result<u32> {
    let value = read_varint(data, pos)?;
    u32::try_from(value).map_err(|_| FormatError::ValueOutOfRange { field, value })
}
