//! Compression codes and directory (de)compression
//!
//! The header names two compressions: the *internal* compression applied to
//! directories and metadata, and the *tile* compression applied to tile blobs.
//! Only directories are ever decompressed here; tile contents stay opaque.

use crate::error::{FormatError, Result};
use flate2::Compression as GzLevel;
use flate2::read::{GzDecoder, GzEncoder};
use std::fmt;
use std::io::Read;

/// Maximum allowed size of a single decompressed directory (64 MiB)
///
/// A leaf directory holds at most a few hundred thousand entries; anything
/// larger is treated as a compression bomb.
pub const MAX_DIRECTORY_SIZE: usize = 64 * 1024 * 1024;

/// Compression type stored in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Compression not specified
    Unknown,
    /// Stored uncompressed
    None,
    /// Gzip (RFC 1952)
    Gzip,
    /// Brotli
    Brotli,
    /// Zstandard
    Zstd,
    /// Code not defined by the v3 format
    Other(u8),
}

impl Compression {
    /// Decode from the header byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Unknown,
            1 => Self::None,
            2 => Self::Gzip,
            3 => Self::Brotli,
            4 => Self::Zstd,
            other => Self::Other(other),
        }
    }

    /// Encode to the header byte
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::None => 1,
            Self::Gzip => 2,
            Self::Brotli => 3,
            Self::Zstd => 4,
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::None => write!(f, "none"),
            Self::Gzip => write!(f, "gzip"),
            Self::Brotli => write!(f, "brotli"),
            Self::Zstd => write!(f, "zstd"),
            Self::Other(code) => write!(f, "code {code}"),
        }
    }
}

/// Tile content type stored in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Type not specified
    Unknown,
    /// Mapbox Vector Tile
    Mvt,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// WebP image
    Webp,
    /// AVIF image
    Avif,
    /// Code not defined by the v3 format
    Other(u8),
}

impl TileType {
    /// Decode from the header byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Unknown,
            1 => Self::Mvt,
            2 => Self::Png,
            3 => Self::Jpeg,
            4 => Self::Webp,
            5 => Self::Avif,
            other => Self::Other(other),
        }
    }

    /// Encode to the header byte
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Mvt => 1,
            Self::Png => 2,
            Self::Jpeg => 3,
            Self::Webp => 4,
            Self::Avif => 5,
            Self::Other(other) => other,
        }
    }
}

/// Decompress a directory buffer using the header's internal compression
pub fn decompress(data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Gzip => {
            let mut decoder = GzDecoder::new(data);
            let mut decompressed = Vec::new();

            // Read in chunks to enforce size limit
            let mut buffer = [0u8; 8192];
            loop {
                let bytes_read = decoder.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                if decompressed.len() + bytes_read > MAX_DIRECTORY_SIZE {
                    return Err(FormatError::DecompressionLimit {
                        limit: MAX_DIRECTORY_SIZE,
                    });
                }
                decompressed.extend_from_slice(&buffer[..bytes_read]);
            }
            Ok(decompressed)
        }
        other => Err(FormatError::UnsupportedCompression(other.to_string())),
    }
}

/// Compress a directory buffer, the inverse of [`decompress`]
pub fn compress(data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(data, GzLevel::default());
            let mut compressed = Vec::new();
            encoder.read_to_end(&mut compressed)?;
            Ok(compressed)
        }
        other => Err(FormatError::UnsupportedCompression(other.to_string())),
    }
}
