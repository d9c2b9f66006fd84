//! Tile size sampling
//!
//! Tile dimensions are read from the image header only; pixel data is never
//! decoded. One tile per level is sampled and the size is assumed constant
//! across that level.

use super::listing::{subdirectories, tile_images};
use image::ImageReader;
use std::path::Path;
use tilemap_common::map::TileSize;

/// Read width/height of an image from its header
///
/// The format is guessed from the file content, falling back to the
/// extension. Returns `None` (and logs) if the file cannot be identified.
pub fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(image = %path.display(), "Cannot open image: {}", e);
            return None;
        }
    };

    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            tracing::warn!(image = %path.display(), "Cannot read image header: {}", e);
            None
        }
    }
}

/// Sample the tile size of one level
///
/// Looks at the first row folder (by name) and the first tile in it.
/// Returns `None` if the level has no row folder, the first row has no
/// tile, or the tile header cannot be read.
pub fn sample_tile_size(level_dir: &Path) -> Option<TileSize> {
    let rows = subdirectories(level_dir);
    let first_row = rows.first()?;

    let tiles = tile_images(first_row);
    let tile = tiles.first()?;

    let (width, height) = probe_dimensions(tile)?;
    tracing::debug!(
        level = %level_dir.display(),
        tile = %tile.display(),
        width,
        height,
        "Sampled tile size"
    );
    Some(TileSize::new(width, height))
}
