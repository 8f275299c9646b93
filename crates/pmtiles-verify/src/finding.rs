//! Structural violations reported by verification

use pmtiles_formats::Entry;
use std::fmt;

/// One structural violation found in an archive
///
/// Findings never abort a run; every one found is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// A tile entry's byte range ends past the tile data section
    OutsideTileData {
        /// Offending entry
        entry: Entry,
        /// Header's tile data length
        tile_data_length: u64,
    },

    /// A clustered archive places new tile content away from the cursor
    OutOfOrder {
        /// Offending entry
        entry: Entry,
        /// Offset the entry should have started at
        expected_offset: u64,
    },

    /// Header addressed tile count differs from the sum of run lengths
    AddressedTilesMismatch {
        /// Value declared in the header
        header: u64,
        /// Value counted in the tree
        actual: u64,
    },

    /// Header tile entry count differs from the number of tile entries
    TileEntriesMismatch {
        /// Value declared in the header
        header: u64,
        /// Value counted in the tree
        actual: u64,
    },

    /// Header tile contents count differs from the number of distinct offsets
    TileContentsMismatch {
        /// Value declared in the header
        header: u64,
        /// Value counted in the tree
        actual: u64,
    },

    /// Header min zoom differs from the zoom of the lowest tile ID
    MinZoomMismatch {
        /// Value declared in the header
        header: u8,
        /// Zoom of the lowest tile ID
        actual: u8,
    },

    /// Header max zoom differs from the zoom of the highest tile ID
    MaxZoomMismatch {
        /// Value declared in the header
        header: u8,
        /// Zoom of the highest tile ID
        actual: u8,
    },

    /// Header center zoom lies outside the header's zoom range
    CenterZoomOutOfRange {
        /// Declared center zoom
        center_zoom: u8,
        /// Declared min zoom
        min_zoom: u8,
        /// Declared max zoom
        max_zoom: u8,
    },

    /// A tile ID lies beyond the maximum supported zoom
    InvalidTileId {
        /// The tile ID
        tile_id: u64,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideTileData {
                entry,
                tile_data_length,
            } => write!(
                f,
                "Invalid: {entry} outside of tile data section (length {tile_data_length})"
            ),
            Self::OutOfOrder {
                entry,
                expected_offset,
            } => write!(
                f,
                "Invalid: out-of-order entry {entry} in clustered archive, expected offset {expected_offset}"
            ),
            Self::AddressedTilesMismatch { header, actual } => write!(
                f,
                "Invalid: header AddressedTilesCount={header} but {actual} tiles addressed"
            ),
            Self::TileEntriesMismatch { header, actual } => write!(
                f,
                "Invalid: header TileEntriesCount={header} but {actual} tile entries"
            ),
            Self::TileContentsMismatch { header, actual } => write!(
                f,
                "Invalid: header TileContentsCount={header} but {actual} tile contents"
            ),
            Self::MinZoomMismatch { header, actual } => write!(
                f,
                "Invalid: header MinZoom={header} does not match min tile z {actual}"
            ),
            Self::MaxZoomMismatch { header, actual } => write!(
                f,
                "Invalid: header MaxZoom={header} does not match max tile z {actual}"
            ),
            Self::CenterZoomOutOfRange {
                center_zoom,
                min_zoom,
                max_zoom,
            } => write!(
                f,
                "Invalid: header CenterZoom={center_zoom} not within MinZoom/MaxZoom ({min_zoom}..={max_zoom})"
            ),
            Self::InvalidTileId { tile_id } => write!(
                f,
                "Invalid: tile ID {tile_id} exceeds the maximum supported zoom"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_both_values() {
        let finding = Finding::AddressedTilesMismatch {
            header: 100,
            actual: 90,
        };
        assert_eq!(
            finding.to_string(),
            "Invalid: header AddressedTilesCount=100 but 90 tiles addressed"
        );
    }

    #[test]
    fn test_display_includes_entry() {
        let finding = Finding::OutsideTileData {
            entry: Entry::new(3, 90, 20, 1),
            tile_data_length: 100,
        };
        assert_eq!(
            finding.to_string(),
            "Invalid: {tile_id: 3, offset: 90, length: 20, run_length: 1} outside of tile data section (length 100)"
        );
    }
}
