//! First-tile search and pyramid root resolution
//!
//! The pyramid may sit a few folders below the directory handed to the
//! importer (archives often wrap it in one or two extra folders). One tile is
//! located with a bounded depth-first search and the root is derived from its
//! position in the `root/level/row/column.ext` layout.

use super::listing::DirListing;
use std::path::{Path, PathBuf};

/// Bounded depth-first search for one tile image
///
/// The start directory is depth 0. A directory at depth `d` is examined only
/// when `d <= max_depth`. Within a directory its own tiles are checked first
/// (first by name wins), then its subdirectories are searched in name order.
#[derive(Debug, Clone, Copy)]
pub struct FirstTileLocator {
    max_depth: usize,
}

impl FirstTileLocator {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Find the first tile image under `root`
    pub fn find(&self, root: &Path) -> Option<PathBuf> {
        self.search(root, 0)
    }

    fn search(&self, dir: &Path, depth: usize) -> Option<PathBuf> {
        if depth > self.max_depth {
            return None;
        }

        let listing = DirListing::read(dir);
        if let Some(tile) = listing.tile_images().next() {
            tracing::debug!(tile = %tile.display(), depth, "Found first tile");
            return Some(tile.clone());
        }

        listing
            .directories
            .iter()
            .find_map(|sub| self.search(sub, depth + 1))
    }
}

/// Derive the pyramid root from a tile path
///
/// The root is the tile's great-grandparent (`root/level/row/column.ext`).
/// Returns `None` when the tile has fewer than three ancestors or the
/// ancestor is not a directory.
pub fn resolve_root(tile: &Path) -> Option<PathBuf> {
    let root = tile.parent()?.parent()?.parent()?;
    if root.as_os_str().is_empty() || !root.is_dir() {
        return None;
    }
    Some(root.to_path_buf())
}
