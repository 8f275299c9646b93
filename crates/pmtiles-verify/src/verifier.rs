//! Accumulator for archive-wide invariants
//!
//! [`Verifier`] is fed every tile entry in traversal order and checks them
//! against the header. It holds no I/O and can be driven from any entry
//! source.

use crate::finding::Finding;
use crate::walker::WalkStats;
use pmtiles_formats::tile_id::zoom_of;
use pmtiles_formats::{Entry, Header};
use roaring::RoaringTreemap;
use std::time::Duration;
use tracing::warn;

/// Running state of one verification pass
#[derive(Debug)]
pub struct Verifier {
    header: Header,
    min_tile_id: Option<u64>,
    max_tile_id: Option<u64>,
    addressed_tiles: u64,
    tile_entries: u64,
    offsets: RoaringTreemap,
    cursor: u64,
    findings: Vec<Finding>,
}

impl Verifier {
    /// Start a pass against `header`
    pub fn new(header: &Header) -> Self {
        Self {
            header: header.clone(),
            min_tile_id: None,
            max_tile_id: None,
            addressed_tiles: 0,
            tile_entries: 0,
            offsets: RoaringTreemap::new(),
            cursor: 0,
            findings: Vec::new(),
        }
    }

    /// Account for one tile entry
    ///
    /// Leaf pointers are not tile entries and must not be passed here.
    pub fn observe(&mut self, entry: &Entry) {
        self.min_tile_id = Some(self.min_tile_id.map_or(entry.tile_id, |id| id.min(entry.tile_id)));
        self.max_tile_id = Some(self.max_tile_id.map_or(entry.tile_id, |id| id.max(entry.tile_id)));
        self.addressed_tiles = self
            .addressed_tiles
            .saturating_add(u64::from(entry.run_length));
        self.tile_entries += 1;

        let first_seen = self.offsets.insert(entry.offset);

        let tile_data_length = self.header.tile_data_length;
        if entry.end_offset().is_none_or(|end| end > tile_data_length) {
            self.record(Finding::OutsideTileData {
                entry: *entry,
                tile_data_length,
            });
        }

        if self.header.clustered && first_seen {
            if entry.offset != self.cursor {
                self.record(Finding::OutOfOrder {
                    entry: *entry,
                    expected_offset: self.cursor,
                });
            }
            self.cursor = self.cursor.saturating_add(u64::from(entry.length));
        }
    }

    /// Sum of run lengths so far
    pub fn addressed_tiles(&self) -> u64 {
        self.addressed_tiles
    }

    /// Number of tile entries so far
    pub fn tile_entries(&self) -> u64 {
        self.tile_entries
    }

    /// Number of distinct tile offsets so far
    pub fn tile_contents(&self) -> u64 {
        self.offsets.len()
    }

    /// Findings recorded so far
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Run the post-traversal checks and return every finding
    pub fn finish(mut self) -> Vec<Finding> {
        let header = &self.header;
        let mut pending = Vec::new();

        if self.addressed_tiles != header.addressed_tiles_count {
            pending.push(Finding::AddressedTilesMismatch {
                header: header.addressed_tiles_count,
                actual: self.addressed_tiles,
            });
        }
        if self.tile_entries != header.tile_entries_count {
            pending.push(Finding::TileEntriesMismatch {
                header: header.tile_entries_count,
                actual: self.tile_entries,
            });
        }
        let tile_contents = self.offsets.len();
        if tile_contents != header.tile_contents_count {
            pending.push(Finding::TileContentsMismatch {
                header: header.tile_contents_count,
                actual: tile_contents,
            });
        }

        // Nothing to compare the zoom range against in an empty tree
        if let (Some(min_id), Some(max_id)) = (self.min_tile_id, self.max_tile_id) {
            match zoom_of(min_id) {
                Ok(z) if z != header.min_zoom => pending.push(Finding::MinZoomMismatch {
                    header: header.min_zoom,
                    actual: z,
                }),
                Ok(_) => {}
                Err(_) => pending.push(Finding::InvalidTileId { tile_id: min_id }),
            }
            match zoom_of(max_id) {
                Ok(z) if z != header.max_zoom => pending.push(Finding::MaxZoomMismatch {
                    header: header.max_zoom,
                    actual: z,
                }),
                Ok(_) => {}
                Err(_) if max_id != min_id => {
                    pending.push(Finding::InvalidTileId { tile_id: max_id });
                }
                Err(_) => {}
            }
        }

        if !(header.min_zoom..=header.max_zoom).contains(&header.center_zoom) {
            pending.push(Finding::CenterZoomOutOfRange {
                center_zoom: header.center_zoom,
                min_zoom: header.min_zoom,
                max_zoom: header.max_zoom,
            });
        }

        for finding in pending {
            self.record(finding);
        }
        self.findings
    }

    fn record(&mut self, finding: Finding) {
        warn!("{finding}");
        self.findings.push(finding);
    }
}

/// Outcome of a completed verification run
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Every violation found, in detection order
    pub findings: Vec<Finding>,
    /// Traversal counters
    pub stats: WalkStats,
    /// Wall time from the header read to the last check
    pub elapsed: Duration,
}

impl VerifyReport {
    /// True when no violation was found
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pmtiles_formats::MAX_TILE_ID;
    use pretty_assertions::assert_eq;

    /// Header whose counts and zooms match `entries`
    fn header_for(entries: &[Entry], clustered: bool) -> Header {
        let mut verifier = Verifier::new(&Header::default());
        for entry in entries {
            verifier.observe(entry);
        }
        let min_zoom = entries.iter().map(|e| zoom_of(e.tile_id).unwrap()).min().unwrap_or(0);
        let max_zoom = entries.iter().map(|e| zoom_of(e.tile_id).unwrap()).max().unwrap_or(0);
        Header {
            addressed_tiles_count: verifier.addressed_tiles(),
            tile_entries_count: verifier.tile_entries(),
            tile_contents_count: verifier.tile_contents(),
            tile_data_length: entries
                .iter()
                .filter_map(Entry::end_offset)
                .max()
                .unwrap_or(0),
            clustered,
            min_zoom,
            max_zoom,
            center_zoom: min_zoom,
            ..Header::default()
        }
    }

    fn run(header: &Header, entries: &[Entry]) -> Vec<Finding> {
        let mut verifier = Verifier::new(header);
        for entry in entries {
            verifier.observe(entry);
        }
        verifier.finish()
    }

    #[test]
    fn test_consistent_entries() {
        let entries = [Entry::new(0, 0, 10, 1), Entry::new(1, 10, 10, 1)];
        let header = header_for(&entries, true);
        assert_eq!(run(&header, &entries), Vec::new());
    }

    #[test]
    fn test_single_tile_runs() {
        let entries = [
            Entry::new(1, 0, 10, 1),
            Entry::new(2, 10, 10, 1),
            Entry::new(3, 20, 10, 1),
        ];
        let mut verifier = Verifier::new(&Header::default());
        entries.iter().for_each(|e| verifier.observe(e));
        assert_eq!(verifier.addressed_tiles(), 3);
        assert_eq!(verifier.tile_entries(), 3);
        assert_eq!(verifier.tile_contents(), 3);
    }

    #[test]
    fn test_long_runs_and_shared_content() {
        // A run of 4 ocean tiles plus a later entry reusing the same blob
        let entries = [
            Entry::new(5, 0, 10, 4),
            Entry::new(9, 10, 30, 1),
            Entry::new(12, 0, 10, 2),
        ];
        let mut verifier = Verifier::new(&Header::default());
        entries.iter().for_each(|e| verifier.observe(e));
        assert_eq!(verifier.addressed_tiles(), 7);
        assert_eq!(verifier.tile_entries(), 3);
        assert_eq!(verifier.tile_contents(), 2);

        let header = header_for(&entries, false);
        assert_eq!(run(&header, &entries), Vec::new());
    }

    #[test]
    fn test_count_mismatches_report_both_values() {
        let entries: Vec<Entry> = (0..9)
            .map(|i| Entry::new(1 + i * 10, i * 5, 5, 10))
            .collect();
        let header = Header {
            addressed_tiles_count: 100,
            ..header_for(&entries, false)
        };

        let findings = run(&header, &entries);
        assert_eq!(
            findings,
            vec![Finding::AddressedTilesMismatch {
                header: 100,
                actual: 90
            }]
        );
        let message = findings[0].to_string();
        assert!(message.contains("100") && message.contains("90"));
    }

    #[test]
    fn test_entry_and_content_count_mismatches() {
        let entries = [Entry::new(0, 0, 10, 1), Entry::new(1, 0, 10, 1)];
        let header = Header {
            tile_entries_count: 3,
            tile_contents_count: 2,
            ..header_for(&entries, false)
        };
        assert_eq!(
            run(&header, &entries),
            vec![
                Finding::TileEntriesMismatch {
                    header: 3,
                    actual: 2
                },
                Finding::TileContentsMismatch {
                    header: 2,
                    actual: 1
                },
            ]
        );
    }

    #[test]
    fn test_outside_tile_data() {
        let entries = [Entry::new(0, 0, 10, 1), Entry::new(1, 10, 10, 1)];
        let header = Header {
            tile_data_length: 15,
            ..header_for(&entries, false)
        };
        assert_eq!(
            run(&header, &entries),
            vec![Finding::OutsideTileData {
                entry: entries[1],
                tile_data_length: 15
            }]
        );
    }

    #[test]
    fn test_overflowing_range_is_outside() {
        let entry = Entry::new(0, u64::MAX - 1, 10, 1);
        let header = Header {
            tile_data_length: u64::MAX,
            addressed_tiles_count: 1,
            tile_entries_count: 1,
            tile_contents_count: 1,
            ..Header::default()
        };
        let findings = run(&header, &[entry]);
        assert!(matches!(findings[0], Finding::OutsideTileData { .. }));
    }

    #[test]
    fn test_clustered_misplaced_entry_reported_once() {
        let entries = [
            Entry::new(0, 0, 10, 1),
            Entry::new(1, 10, 10, 1),
            Entry::new(2, 30, 10, 1),
        ];
        let header = Header {
            tile_data_length: 40,
            ..header_for(&entries, true)
        };
        assert_eq!(
            run(&header, &entries),
            vec![Finding::OutOfOrder {
                entry: entries[2],
                expected_offset: 20
            }]
        );
    }

    #[test]
    fn test_clustered_moved_entry_reported_once() {
        // The blob of tile 1 was written last; the cursor keeps counting
        // lengths so the entries after it still line up
        let entries = [
            Entry::new(0, 0, 10, 1),
            Entry::new(1, 50, 10, 1),
            Entry::new(2, 20, 10, 1),
            Entry::new(3, 30, 10, 1),
        ];
        let header = Header {
            tile_data_length: 60,
            ..header_for(&entries, true)
        };
        assert_eq!(
            run(&header, &entries),
            vec![Finding::OutOfOrder {
                entry: entries[1],
                expected_offset: 10
            }]
        );
    }

    #[test]
    fn test_clustered_cursor_advances_by_length() {
        let entries = [
            Entry::new(0, 0, 10, 1),
            Entry::new(1, 20, 10, 1),
            Entry::new(2, 30, 10, 1),
        ];
        let header = Header {
            tile_data_length: 40,
            ..header_for(&entries, true)
        };
        assert_eq!(
            run(&header, &entries),
            vec![
                Finding::OutOfOrder {
                    entry: entries[1],
                    expected_offset: 10
                },
                Finding::OutOfOrder {
                    entry: entries[2],
                    expected_offset: 20
                },
            ]
        );
    }

    #[test]
    fn test_clustered_repeated_offsets_are_not_checked() {
        let entries = [
            Entry::new(0, 0, 10, 1),
            Entry::new(1, 10, 10, 1),
            Entry::new(2, 0, 10, 1),
            Entry::new(3, 20, 10, 1),
        ];
        let header = header_for(&entries, true);
        assert_eq!(run(&header, &entries), Vec::new());
    }

    #[test]
    fn test_unclustered_ignores_order() {
        let entries = [Entry::new(0, 30, 10, 1), Entry::new(1, 0, 10, 1)];
        let header = header_for(&entries, false);
        assert_eq!(run(&header, &entries), Vec::new());
    }

    #[test]
    fn test_zoom_mismatches() {
        // Tile IDs 0 (z0) and 5 (z2)
        let entries = [Entry::new(0, 0, 10, 1), Entry::new(5, 10, 10, 1)];
        let header = Header {
            min_zoom: 1,
            max_zoom: 3,
            center_zoom: 2,
            ..header_for(&entries, false)
        };
        assert_eq!(
            run(&header, &entries),
            vec![
                Finding::MinZoomMismatch {
                    header: 1,
                    actual: 0
                },
                Finding::MaxZoomMismatch {
                    header: 3,
                    actual: 2
                },
            ]
        );
    }

    #[test]
    fn test_center_zoom_out_of_range() {
        let entries = [Entry::new(0, 0, 10, 1)];
        let header = Header {
            center_zoom: 4,
            ..header_for(&entries, false)
        };
        assert_eq!(
            run(&header, &entries),
            vec![Finding::CenterZoomOutOfRange {
                center_zoom: 4,
                min_zoom: 0,
                max_zoom: 0
            }]
        );
    }

    #[test]
    fn test_empty_tree_skips_zoom_checks() {
        let header = Header {
            min_zoom: 3,
            max_zoom: 5,
            center_zoom: 4,
            ..Header::default()
        };
        assert_eq!(run(&header, &[]), Vec::new());
    }

    #[test]
    fn test_invalid_tile_id_is_a_finding() {
        let entries = [Entry::new(0, 0, 10, 1), Entry::new(MAX_TILE_ID, 10, 10, 1)];
        let header = Header {
            addressed_tiles_count: 2,
            tile_entries_count: 2,
            tile_contents_count: 2,
            tile_data_length: 20,
            ..Header::default()
        };
        assert_eq!(
            run(&header, &entries),
            vec![Finding::InvalidTileId {
                tile_id: MAX_TILE_ID
            }]
        );
    }

    #[test]
    fn test_report_validity() {
        let report = VerifyReport {
            findings: Vec::new(),
            stats: WalkStats::default(),
            elapsed: Duration::from_millis(3),
        };
        assert!(report.is_valid());
    }
}
