//! Error types for PMTiles format decoding

use thiserror::Error;

/// Errors that can occur when decoding or encoding PMTiles structures
#[derive(Debug, Error)]
pub enum FormatError {
    /// Data is too short for the expected structure
    #[error("Truncated data: expected {expected} bytes, got {actual} bytes")]
    TruncatedData {
        /// Expected minimum size
        expected: usize,
        /// Actual data size
        actual: usize,
    },

    /// Invalid magic bytes (expected "PMTiles")
    #[error("Invalid magic: expected 'PMTiles', got {0:?}")]
    InvalidMagic([u8; 7]),

    /// Unsupported format version (only v3 is supported)
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// Varint ran past the end of the buffer or exceeded 64 bits
    #[error("Malformed varint at offset {0}")]
    Varint(usize),

    /// Decoded value does not fit the field width
    #[error("Value {value} out of range for {field}")]
    ValueOutOfRange {
        /// Field being decoded
        field: &'static str,
        /// Decoded value
        value: u64,
    },

    /// Bytes left over after the last directory column
    #[error("Trailing data in directory: {0} bytes")]
    TrailingData(usize),

    /// A leaf pointer leads back to a directory node already read
    #[error("Directory at offset {offset} (length {length}) is referenced more than once")]
    RepeatedDirectory {
        /// Absolute offset of the node
        offset: u64,
        /// Length of the node
        length: u64,
    },

    /// Directory compression that this crate cannot decode
    #[error("Unsupported internal compression: {0}")]
    UnsupportedCompression(String),

    /// Decompressed output exceeds the allowed size
    #[error("Decompressed directory exceeds {limit} bytes")]
    DecompressionLimit {
        /// Maximum allowed output size
        limit: usize,
    },

    /// Tile ID beyond the last supported zoom level
    #[error("Tile ID {0} exceeds the maximum supported zoom")]
    TileIdOutOfRange(u64),

    /// Zoom level above the maximum supported zoom
    #[error("Zoom {0} exceeds the maximum supported zoom of 31")]
    ZoomOutOfRange(u8),

    /// x or y outside the grid for the zoom level
    #[error("Coordinate ({x}, {y}) out of range for zoom {z}")]
    CoordinateOutOfRange {
        /// Zoom level
        z: u8,
        /// Column
        x: u32,
        /// Row
        y: u32,
    },

    /// Binary read/write error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// IO error during decompression or encoding
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for FormatError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormatError::InvalidMagic(*b"PMTilez");
        assert!(err.to_string().contains("'PMTiles'"));

        let err = FormatError::TruncatedData {
            expected: 127,
            actual: 12,
        };
        assert!(err.to_string().contains("127"));
        assert!(err.to_string().contains("12"));

        let err = FormatError::CoordinateOutOfRange { z: 2, x: 4, y: 0 };
        assert_eq!(err.to_string(), "Coordinate (4, 0) out of range for zoom 2");
    }
}
