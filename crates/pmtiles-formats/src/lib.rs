//! Codecs for PMTiles v3 archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::redundant_closure)] // binrw map attributes
#![allow(clippy::needless_range_loop)] // Offset column refers back to the previous entry
//! This crate decodes and encodes the on-disk structures of a PMTiles v3
//! archive. It performs no I/O: callers fetch byte ranges however they like
//! and hand the bytes over for decoding.
//!
//! # Supported Structures
//!
//! - **Header**: the fixed 127-byte preamble locating every other section
//! - **Directory**: varint column-encoded lists of tile and leaf entries
//! - **Tile ID**: Hilbert-curve addressing of `(z, x, y)` coordinates
//! - **Compression**: gzip and uncompressed directories
//!
//! # Archive Layout
//!
//! ```text
//! +--------+----------------+----------+-------------------+-----------+
//! | header | root directory | metadata | leaf directories  | tile data |
//! +--------+----------------+----------+-------------------+-----------+
//! ```
//!
//! Section order after the root directory is not fixed; offsets in the
//! header are authoritative.

#![warn(missing_docs)]

pub mod compression;
pub mod directory;
pub mod error;
pub mod header;
pub mod tile_id;

pub use compression::{Compression, TileType};
pub use directory::{Directory, Entry, find_tile};
pub use error::{FormatError, Result};
pub use header::{HEADER_LEN, Header};
pub use tile_id::{MAX_TILE_ID, MAX_ZOOM, TileCoord, tile_id_to_zxy, zxy_to_tile_id};
