//! Map size computation
//!
//! Only the deepest level is measured: rows are its immediate subfolders and
//! columns are the tiles of its first row folder. Other levels are assumed to
//! be consistent with it.

use super::listing::{subdirectories, tile_images};
use std::path::Path;
use tilemap_common::map::{MapSize, TileSize};

/// Row and column count of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: u32,
    pub columns: u32,
}

impl GridSize {
    /// Pixel size of the grid for a given tile size, `None` on overflow
    pub fn map_size(&self, tile_size: TileSize) -> Option<MapSize> {
        Some(MapSize {
            width: self.columns.checked_mul(tile_size.width)?,
            height: self.rows.checked_mul(tile_size.height)?,
        })
    }
}

/// Count the rows of a level and the tiles of its first row
///
/// Returns `None` when the level has no row folder or its first row holds
/// no tile.
pub fn measure_grid(level_dir: &Path) -> Option<GridSize> {
    let rows = subdirectories(level_dir);
    let first_row = rows.first()?;
    let row_count = u32::try_from(rows.len()).ok()?;

    let column_count = u32::try_from(tile_images(first_row).len()).ok()?;
    if column_count == 0 {
        return None;
    }

    tracing::debug!(
        level = %level_dir.display(),
        rows = row_count,
        columns = column_count,
        "Measured level grid"
    );

    Some(GridSize {
        rows: row_count,
        columns: column_count,
    })
}

/// Compute the total pixel size of the pyramid from its deepest level
pub fn compute_map_size(deepest_level_dir: &Path, tile_size: TileSize) -> Option<MapSize> {
    measure_grid(deepest_level_dir)?.map_size(tile_size)
}
