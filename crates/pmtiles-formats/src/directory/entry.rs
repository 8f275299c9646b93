//! Directory entry

use std::fmt;

/// One record of a directory node
///
/// A `run_length` of zero marks a pointer to a leaf directory, in which case
/// `offset` is relative to the header's leaf directory base. Otherwise the
/// entry points into the tile data section and answers for tile IDs
/// `tile_id..tile_id + run_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
    /// First tile ID answered by this entry
    pub tile_id: u64,
    /// Byte offset of the tile blob or leaf directory
    pub offset: u64,
    /// Byte length of the tile blob or leaf directory
    pub length: u32,
    /// Number of consecutive tile IDs sharing this blob, 0 for leaf pointers
    pub run_length: u32,
}

impl Entry {
    /// Create a tile entry
    pub fn new(tile_id: u64, offset: u64, length: u32, run_length: u32) -> Self {
        Self {
            tile_id,
            offset,
            length,
            run_length,
        }
    }

    /// Create a leaf directory pointer
    pub fn leaf(tile_id: u64, offset: u64, length: u32) -> Self {
        Self::new(tile_id, offset, length, 0)
    }

    /// Whether this entry points to a leaf directory
    pub fn is_leaf(&self) -> bool {
        self.run_length == 0
    }

    /// Whether this tile entry answers for `tile_id`
    ///
    /// Always false for leaf pointers, whose coverage is only known after
    /// reading the leaf.
    pub fn covers(&self, tile_id: u64) -> bool {
        !self.is_leaf()
            && tile_id >= self.tile_id
            && tile_id - self.tile_id < u64::from(self.run_length)
    }

    /// End of the referenced byte range, or `None` on overflow
    pub fn end_offset(&self) -> Option<u64> {
        self.offset.checked_add(u64::from(self.length))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{tile_id: {}, offset: {}, length: {}, run_length: {}}}",
            self.tile_id, self.offset, self.length, self.run_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tile_coverage() {
        let entry = Entry::new(10, 0, 100, 1);
        assert!(!entry.is_leaf());
        assert!(entry.covers(10));
        assert!(!entry.covers(9));
        assert!(!entry.covers(11));
    }

    #[test]
    fn test_run_coverage() {
        let entry = Entry::new(10, 0, 100, 4);
        assert!((10..14).all(|id| entry.covers(id)));
        assert!(!entry.covers(14));
    }

    #[test]
    fn test_leaf_covers_nothing_directly() {
        let leaf = Entry::leaf(10, 0, 50);
        assert!(leaf.is_leaf());
        assert!(!leaf.covers(10));
    }

    #[test]
    fn test_end_offset() {
        assert_eq!(Entry::new(0, 90, 10, 1).end_offset(), Some(100));
        assert_eq!(Entry::new(0, u64::MAX, 1, 1).end_offset(), None);
    }

    #[test]
    fn test_display() {
        let entry = Entry::new(5, 20, 30, 2);
        assert_eq!(
            entry.to_string(),
            "{tile_id: 5, offset: 20, length: 30, run_length: 2}"
        );
    }
}
