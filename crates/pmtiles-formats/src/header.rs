//! Fixed-size v3 archive header
//!
//! The header is the first 127 bytes of every archive. All multi-byte fields
//! are little-endian. Decoding only checks the magic and version; the counts
//! and zoom bounds are taken at face value and cross-checked elsewhere.

use crate::compression::{Compression, TileType};
use crate::error::{FormatError, Result};
use binrw::{BinRead, BinWrite};
use std::io::Cursor;

/// Magic bytes at offset 0
pub const MAGIC: [u8; 7] = *b"PMTiles";

/// The only format version this crate decodes
pub const FORMAT_VERSION: u8 = 3;

/// Serialized header length in bytes
pub const HEADER_LEN: usize = 127;

/// PMTiles v3 header (127 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct Header {
    /// Magic bytes: "PMTiles"
    pub magic: [u8; 7],

    /// Format version (3)
    pub version: u8,

    /// Offset of the root directory
    pub root_offset: u64,

    /// Length of the root directory
    pub root_length: u64,

    /// Offset of the JSON metadata
    pub metadata_offset: u64,

    /// Length of the JSON metadata
    pub metadata_length: u64,

    /// Base offset that leaf entry offsets are relative to
    pub leaf_directory_offset: u64,

    /// Length of the leaf directory section
    pub leaf_directory_length: u64,

    /// Offset of the tile data section
    pub tile_data_offset: u64,

    /// Length of the tile data section
    pub tile_data_length: u64,

    /// Number of tile IDs that resolve to tile data
    pub addressed_tiles_count: u64,

    /// Number of tile entries across all directories
    pub tile_entries_count: u64,

    /// Number of distinct tile blobs
    pub tile_contents_count: u64,

    /// Tile data is laid out in tile ID order without gaps
    #[br(map = |x: u8| x == 1)]
    #[bw(map = |x: &bool| u8::from(*x))]
    pub clustered: bool,

    /// Compression of directories and metadata
    #[br(map = |x: u8| Compression::from_byte(x))]
    #[bw(map = |x: &Compression| x.as_byte())]
    pub internal_compression: Compression,

    /// Compression of tile blobs
    #[br(map = |x: u8| Compression::from_byte(x))]
    #[bw(map = |x: &Compression| x.as_byte())]
    pub tile_compression: Compression,

    /// Tile content type
    #[br(map = |x: u8| TileType::from_byte(x))]
    #[bw(map = |x: &TileType| x.as_byte())]
    pub tile_type: TileType,

    /// Lowest zoom level with tiles
    pub min_zoom: u8,

    /// Highest zoom level with tiles
    pub max_zoom: u8,

    /// Bounds, longitude × 10^7
    pub min_lon_e7: i32,

    /// Bounds, latitude × 10^7
    pub min_lat_e7: i32,

    /// Bounds, longitude × 10^7
    pub max_lon_e7: i32,

    /// Bounds, latitude × 10^7
    pub max_lat_e7: i32,

    /// Default zoom for display
    pub center_zoom: u8,

    /// Default center, longitude × 10^7
    pub center_lon_e7: i32,

    /// Default center, latitude × 10^7
    pub center_lat_e7: i32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            root_offset: HEADER_LEN as u64,
            root_length: 0,
            metadata_offset: 0,
            metadata_length: 0,
            leaf_directory_offset: 0,
            leaf_directory_length: 0,
            tile_data_offset: 0,
            tile_data_length: 0,
            addressed_tiles_count: 0,
            tile_entries_count: 0,
            tile_contents_count: 0,
            clustered: false,
            internal_compression: Compression::Gzip,
            tile_compression: Compression::Unknown,
            tile_type: TileType::Unknown,
            min_zoom: 0,
            max_zoom: 0,
            min_lon_e7: -180 * 10_000_000,
            min_lat_e7: -85 * 10_000_000,
            max_lon_e7: 180 * 10_000_000,
            max_lat_e7: 85 * 10_000_000,
            center_zoom: 0,
            center_lon_e7: 0,
            center_lat_e7: 0,
        }
    }
}

impl Header {
    /// Decode a header from the first [`HEADER_LEN`] bytes of `data`
    ///
    /// Extra bytes after the header are ignored so callers can pass a larger
    /// prefix of the archive.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::TruncatedData {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut magic = [0u8; 7];
        magic.copy_from_slice(&data[..7]);
        if magic != MAGIC {
            return Err(FormatError::InvalidMagic(magic));
        }
        if data[7] != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(data[7]));
        }

        let mut cursor = Cursor::new(&data[..HEADER_LEN]);
        Ok(Self::read(&mut cursor)?)
    }

    /// Encode the header to its 127-byte form
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(HEADER_LEN);
        let mut cursor = Cursor::new(&mut buffer);
        self.write(&mut cursor)?;
        Ok(buffer)
    }
}
