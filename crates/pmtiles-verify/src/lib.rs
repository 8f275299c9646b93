//! Structural verification of PMTiles v3 archives
//!
//! [`verify`] resolves a location, reads the header, walks every directory
//! node and cross-checks what it finds against the header:
//!
//! - every tile entry lies inside the tile data section
//! - clustered archives store new tile content in tile ID order without gaps
//! - addressed tile, tile entry and tile content counts match the header
//! - the zooms of the lowest and highest tile IDs match the header
//! - the center zoom lies inside the header's zoom range
//!
//! Violations are collected as [`Finding`]s and never stop the walk. I/O
//! and decoding failures abort the run with a [`VerifyError`].
//!
//! ```rust,no_run
//! use pmtiles_verify::{VerifyOptions, verify};
//!
//! # async fn example() -> Result<(), pmtiles_verify::VerifyError> {
//! let report = verify("world.pmtiles", &VerifyOptions::default()).await?;
//! for finding in &report.findings {
//!     println!("{finding}");
//! }
//! println!("Completed verify in {:?}.", report.elapsed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod finding;
pub mod verifier;
pub mod verify;
pub mod walker;

pub use cancel::CancellationToken;
pub use config::VerifyArgs;
pub use error::{Result, VerifyError};
pub use finding::Finding;
pub use verifier::{Verifier, VerifyReport};
pub use verify::{VerifyOptions, verify, verify_bucket};
pub use walker::{DirectoryWalker, WalkStats};
