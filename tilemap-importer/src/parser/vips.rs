//! Parser for pyramids produced by libvips
//!
//! `vips dzsave --layout google` writes `root/<level>/<row>/<column>.<ext>`
//! plus a `blank` placeholder tile and, optionally, a thumbnail next to the
//! level folders. The directory handed to the parser may be the root itself
//! or any folder a few levels above it.
//!
//! Pipeline, stopping at the first failure:
//! 1. input must be a directory (`NotADirectory`)
//! 2. locate one tile and derive the root from it (`NoParentFolderFound`)
//! 3. existing `map.json` at the root → load it and stop (`EXISTING_MAP`)
//! 4. enumerate levels and sample their tile size (`NoLevelFound`)
//! 5. measure the deepest level (`MapSizeIncorrect`, or `NoLevelFound` when
//!    its tile size could not be sampled)
//! 6. find a thumbnail and assemble the descriptor (`NEW_MAP`)

use super::{MapParser, ParserContext};
use crate::loader::DescriptorLoader;
use crate::services::{
    enumerate_levels, find_thumbnail, measure_grid, resolve_root, sample_tile_size,
    FirstTileLocator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilemap_common::map::{Calibration, CalibrationMethod, Level, Provider, MAP_FILE_NAME};
use tilemap_common::{ImportStatus, MapDescriptor, MapOrigin, ParseError};
use tokio_util::sync::CancellationToken;

/// Parser for libvips tile pyramids
pub struct VipsMapParser {
    loader: Arc<dyn DescriptorLoader>,
    locator: FirstTileLocator,
    status: ImportStatus,
}

impl VipsMapParser {
    pub fn new(context: &ParserContext) -> Self {
        Self {
            loader: Arc::clone(&context.loader),
            locator: FirstTileLocator::new(context.settings.max_search_depth),
            status: ImportStatus::NoMap,
        }
    }

    /// Factory registered for [`MapOrigin::Vips`]
    pub fn boxed(context: &ParserContext) -> Box<dyn MapParser> {
        Box::new(Self::new(context))
    }

    fn build(
        &mut self,
        directory: &Path,
        cancel: &CancellationToken,
    ) -> Result<MapDescriptor, ParseError> {
        if !directory.is_dir() {
            return Err(ParseError::NotADirectory);
        }
        let directory = directory
            .canonicalize()
            .unwrap_or_else(|_| directory.to_path_buf());

        // Find the first tile and use it to deduce the pyramid root
        check_cancelled(cancel)?;
        let tile = self
            .locator
            .find(&directory)
            .ok_or(ParseError::NoParentFolderFound)?;
        let root = resolve_root(&tile).ok_or(ParseError::NoParentFolderFound)?;
        tracing::debug!(root = %root.display(), tile = %tile.display(), "Resolved pyramid root");

        if let Some(existing) = self.load_existing(&root) {
            self.status = ImportStatus::ExistingMap;
            return Ok(existing);
        }

        // Levels, each with the size of one sampled tile
        check_cancelled(cancel)?;
        let scan = enumerate_levels(&root)?;
        let mut levels = Vec::with_capacity(scan.levels.len());
        let mut deepest: Option<(&PathBuf, Option<Level>)> = None;

        for (index, level_dir) in &scan.levels {
            check_cancelled(cancel)?;
            let level = sample_tile_size(level_dir).map(|tile_size| Level {
                level: *index,
                tile_size,
            });
            match level {
                Some(level) => {
                    tracing::debug!(level = index, tile_width = level.tile_size.width, "Creating level");
                    levels.push(level);
                }
                None => {
                    tracing::warn!(level = index, "No tile size for level, omitting it");
                }
            }
            deepest = Some((level_dir, level));
        }

        // Map size, from the deepest level only. The grid is checked before
        // the tile size so an empty row reports as a malformed level.
        check_cancelled(cancel)?;
        let (deepest_dir, deepest_level) = deepest.ok_or(ParseError::NoLevelFound)?;
        let grid = measure_grid(deepest_dir).ok_or(ParseError::MapSizeIncorrect)?;
        let deepest_level = deepest_level.ok_or(ParseError::NoLevelFound)?;
        let size = grid
            .map_size(deepest_level.tile_size)
            .ok_or(ParseError::MapSizeIncorrect)?;

        check_cancelled(cancel)?;
        let thumbnail = find_thumbnail(&root).and_then(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });

        let descriptor = MapDescriptor {
            name: folder_name(&root),
            levels,
            provider: Provider {
                generated_by: MapOrigin::Vips,
                image_extension: image_extension(&tile),
            },
            size,
            thumbnail,
            calibration: Calibration {
                calibration_method: CalibrationMethod::Simple2Points,
            },
            directory: root,
        };

        self.status = ImportStatus::NewMap;
        Ok(descriptor)
    }

    /// Defer to the loader when the root already has a descriptor file
    fn load_existing(&self, root: &Path) -> Option<MapDescriptor> {
        if !root.join(MAP_FILE_NAME).exists() {
            return None;
        }
        let descriptor = self.loader.load_maps(root).into_iter().next();
        if descriptor.is_none() {
            tracing::warn!(
                root = %root.display(),
                "Descriptor file present but no map loaded, computing a new one"
            );
        }
        descriptor
    }
}

impl MapParser for VipsMapParser {
    fn parse(
        &mut self,
        directory: &Path,
        cancel: &CancellationToken,
    ) -> Result<MapDescriptor, ParseError> {
        self.status = ImportStatus::NoMap;
        self.build(directory, cancel)
    }

    fn status(&self) -> ImportStatus {
        self.status
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), ParseError> {
    if cancel.is_cancelled() {
        return Err(ParseError::Cancelled);
    }
    Ok(())
}

/// Extension of the tile, with the dot (e.g. `.jpg`)
fn image_extension(tile: &Path) -> String {
    tile.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rfind('.').map(|dot| name[dot..].to_string()))
        .unwrap_or_default()
}

fn folder_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parser() -> VipsMapParser {
        VipsMapParser::new(&ParserContext::default())
    }

    #[test]
    fn test_image_extension_keeps_dot() {
        assert_eq!(image_extension(Path::new("/m/2/0/1.jpg")), ".jpg");
        assert_eq!(image_extension(Path::new("/m/2/0/1.webp")), ".webp");
    }

    #[test]
    fn test_file_input_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("map.zip");
        fs::write(&file, b"PK").unwrap();

        let mut parser = parser();
        let result = parser.parse(&file, &CancellationToken::new());
        assert_eq!(result, Err(ParseError::NotADirectory));
        assert_eq!(parser.status(), ImportStatus::NoMap);
    }

    #[test]
    fn test_directory_without_tiles_has_no_parent_folder() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/readme.txt"), b"hi").unwrap();

        let result = parser().parse(dir.path(), &CancellationToken::new());
        assert_eq!(result, Err(ParseError::NoParentFolderFound));
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = parser().parse(dir.path(), &cancel);
        assert_eq!(result, Err(ParseError::Cancelled));
    }
}
