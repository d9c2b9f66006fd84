//! Discovery services
//!
//! Leaf-first building blocks of the import pipeline. Each one is a pure
//! function of on-disk state at call time and holds no state across calls.

pub mod classifier;
pub mod level_enumerator;
pub mod listing;
pub mod map_size;
pub mod thumbnail_locator;
pub mod tile_locator;
pub mod tile_sampler;

pub use level_enumerator::{enumerate_levels, LevelScan};
pub use map_size::{compute_map_size, measure_grid, GridSize};
pub use thumbnail_locator::{find_thumbnail, THUMBNAIL_ACCEPT_SIZE, THUMBNAIL_EXCLUDE_NAME};
pub use tile_locator::{resolve_root, FirstTileLocator};
pub use tile_sampler::{probe_dimensions, sample_tile_size};
