//! Thumbnail discovery
//!
//! A thumbnail is a square raster image of a fixed size sitting directly
//! under the pyramid root. Tiling tools also drop a "blank" placeholder tile
//! of the same size there, which must never be picked.

use super::listing::DirListing;
use super::tile_sampler::probe_dimensions;
use std::path::{Path, PathBuf};

/// Required width and height of a thumbnail, in pixels
pub const THUMBNAIL_ACCEPT_SIZE: u32 = 256;

/// File names containing this (case-insensitive) are never thumbnails
pub const THUMBNAIL_EXCLUDE_NAME: &str = "blank";

/// Find the first qualifying thumbnail directly under `root`
///
/// Candidates are examined in name order; the first one that is exactly
/// 256x256 and not named like a placeholder wins.
pub fn find_thumbnail(root: &Path) -> Option<PathBuf> {
    let listing = DirListing::read(root);

    for candidate in listing.thumbnail_candidates() {
        if is_excluded(candidate) {
            tracing::debug!(candidate = %candidate.display(), "Skipping placeholder image");
            continue;
        }

        if let Some((width, height)) = probe_dimensions(candidate) {
            if width == THUMBNAIL_ACCEPT_SIZE && height == THUMBNAIL_ACCEPT_SIZE {
                tracing::debug!(thumbnail = %candidate.display(), "Found thumbnail");
                return Some(candidate.clone());
            }
        }
    }

    None
}

fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_lowercase()
                .contains(THUMBNAIL_EXCLUDE_NAME)
        })
        .unwrap_or(false)
}
