//! Archive builder shared by integration tests

#![allow(dead_code)]

use pmtiles_formats::tile_id::zoom_of;
use pmtiles_formats::{Compression, Directory, Entry, HEADER_LEN, Header, TileType};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A directory node in a test tree
pub enum Node {
    /// Node holding tile entries only
    Tiles(Vec<Entry>),
    /// Node holding leaf pointers, keyed by the first tile ID below them
    Leaves(Vec<(u64, Node)>),
}

impl Node {
    /// Every tile entry below this node in depth-first order
    pub fn tile_entries(&self) -> Vec<Entry> {
        match self {
            Self::Tiles(entries) => entries.clone(),
            Self::Leaves(children) => children
                .iter()
                .flat_map(|(_, child)| child.tile_entries())
                .collect(),
        }
    }
}

/// Clustered tile entries for consecutive tile IDs, 10 bytes each
pub fn clustered_tiles(first_tile_id: u64, count: u64) -> Vec<Entry> {
    (0..count)
        .map(|i| Entry::new(first_tile_id + i, (first_tile_id + i) * 10, 10, 1))
        .collect()
}

/// Header whose counts, zooms and tile data length match `root`
pub fn consistent_header(root: &Node, clustered: bool) -> Header {
    let entries = root.tile_entries();
    let offsets: BTreeSet<u64> = entries.iter().map(|e| e.offset).collect();
    let zooms: Vec<u8> = entries
        .iter()
        .map(|e| zoom_of(e.tile_id).expect("Should be a valid tile ID"))
        .collect();
    let min_zoom = zooms.iter().copied().min().unwrap_or(0);
    let max_zoom = zooms.iter().copied().max().unwrap_or(0);

    Header {
        addressed_tiles_count: entries.iter().map(|e| u64::from(e.run_length)).sum(),
        tile_entries_count: entries.len() as u64,
        tile_contents_count: offsets.len() as u64,
        tile_data_length: entries
            .iter()
            .filter_map(Entry::end_offset)
            .max()
            .unwrap_or(0),
        clustered,
        internal_compression: Compression::Gzip,
        tile_compression: Compression::Gzip,
        tile_type: TileType::Mvt,
        min_zoom,
        max_zoom,
        center_zoom: min_zoom,
        ..Header::default()
    }
}

/// Serialize `root` below `header`
///
/// Section offsets in `header` are overwritten; everything else is kept as
/// given so tests can plant inconsistencies.
pub fn build_archive(root: &Node, mut header: Header) -> Vec<u8> {
    let compression = header.internal_compression;
    let mut leaves = Vec::new();
    let root_bytes = encode_node(root, &mut leaves, compression);

    let header_len = HEADER_LEN as u64;
    header.root_offset = header_len;
    header.root_length = root_bytes.len() as u64;
    header.metadata_offset = header.root_offset + header.root_length;
    header.metadata_length = 0;
    header.leaf_directory_offset = header.metadata_offset;
    header.leaf_directory_length = leaves.len() as u64;
    header.tile_data_offset = header.leaf_directory_offset + header.leaf_directory_length;

    let mut archive = header.build().expect("Should build header");
    archive.extend_from_slice(&root_bytes);
    archive.extend_from_slice(&leaves);
    archive.resize(archive.len() + header.tile_data_length as usize, 0);
    archive
}

fn encode_node(node: &Node, leaves: &mut Vec<u8>, compression: Compression) -> Vec<u8> {
    let entries = match node {
        Node::Tiles(entries) => entries.clone(),
        Node::Leaves(children) => children
            .iter()
            .map(|(tile_id, child)| {
                let bytes = encode_node(child, leaves, compression);
                let offset = leaves.len() as u64;
                leaves.extend_from_slice(&bytes);
                Entry::leaf(*tile_id, offset, bytes.len() as u32)
            })
            .collect(),
    };
    Directory::new(entries)
        .build(compression)
        .expect("Should build directory")
}

/// Write an archive into `dir` and return its path
pub fn write_archive(dir: &Path, name: &str, archive: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, archive).expect("Should write archive");
    path
}
