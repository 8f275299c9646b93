//! Tile ID addressing
//!
//! A tile ID packs `(z, x, y)` into one `u64`. Zoom levels occupy consecutive
//! bands (`z` starts at `(4^z - 1) / 3`), and inside a band tiles are numbered
//! along a Hilbert curve so neighbouring tiles get neighbouring IDs.
//!
//! ```rust
//! use pmtiles_formats::tile_id::{tile_id_to_zxy, zxy_to_tile_id};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let id = zxy_to_tile_id(12, 3423, 1763)?;
//! assert_eq!(id, 19_078_479);
//! assert_eq!(tile_id_to_zxy(id)?, (12, 3423, 1763));
//! # Ok(())
//! # }
//! ```

use crate::error::{FormatError, Result};
use std::fmt;

/// Highest zoom level addressable by a `u64` tile ID
pub const MAX_ZOOM: u8 = 31;

/// First tile ID past the last supported zoom band, `(4^32 - 1) / 3`
pub const MAX_TILE_ID: u64 = 6_148_914_691_236_517_205;

/// First tile ID of zoom band `z` (`z <= MAX_ZOOM`)
const fn zoom_base(z: u8) -> u64 {
    ((1u64 << (2 * z as u32)) - 1) / 3
}

/// Hilbert quadrant rotation on an `n × n` grid
fn rotate(n: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
    if ry == 0 {
        if rx == 1 {
            *x = n - 1 - *x;
            *y = n - 1 - *y;
        }
        std::mem::swap(x, y);
    }
}

/// Convert a tile coordinate to its tile ID
pub fn zxy_to_tile_id(z: u8, x: u32, y: u32) -> Result<u64> {
    if z > MAX_ZOOM {
        return Err(FormatError::ZoomOutOfRange(z));
    }
    let n = 1u64 << z;
    if u64::from(x) >= n || u64::from(y) >= n {
        return Err(FormatError::CoordinateOutOfRange { z, x, y });
    }

    let (mut tx, mut ty) = (u64::from(x), u64::from(y));
    let mut d = 0u64;
    let mut s = n / 2;
    while s > 0 {
        let rx = u64::from(tx & s > 0);
        let ry = u64::from(ty & s > 0);
        d += s * s * ((3 * rx) ^ ry);
        rotate(n, &mut tx, &mut ty, rx, ry);
        s /= 2;
    }

    Ok(zoom_base(z) + d)
}

/// Convert a tile ID back to `(z, x, y)`
pub fn tile_id_to_zxy(tile_id: u64) -> Result<(u8, u32, u32)> {
    let z = zoom_of(tile_id)?;
    let n = 1u64 << z;

    let mut t = tile_id - zoom_base(z);
    let (mut x, mut y) = (0u64, 0u64);
    let mut s = 1u64;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rotate(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }

    Ok((z, x as u32, y as u32))
}

/// Zoom level of a tile ID without decoding x and y
pub fn zoom_of(tile_id: u64) -> Result<u8> {
    if tile_id >= MAX_TILE_ID {
        return Err(FormatError::TileIdOutOfRange(tile_id));
    }
    // Bands grow by 4x, so at most 32 iterations
    let mut z = 0u8;
    while z < MAX_ZOOM && zoom_base(z + 1) <= tile_id {
        z += 1;
    }
    Ok(z)
}

/// A tile coordinate in the XYZ scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level
    pub z: u8,
    /// Column
    pub x: u32,
    /// Row (north to south)
    pub y: u32,
}

impl TileCoord {
    /// Create a coordinate, checking it lies on the grid for its zoom
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self> {
        zxy_to_tile_id(z, x, y)?;
        Ok(Self { z, x, y })
    }

    /// Tile ID of this coordinate
    pub fn tile_id(&self) -> Result<u64> {
        zxy_to_tile_id(self.z, self.x, self.y)
    }

    /// Decode a tile ID
    pub fn from_tile_id(tile_id: u64) -> Result<Self> {
        let (z, x, y) = tile_id_to_zxy(tile_id)?;
        Ok(Self { z, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
