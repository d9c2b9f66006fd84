//! Test Helper Utilities
//!
//! Builds tile pyramids on disk with real image files so the importer's
//! header probing sees genuine PNG/JPEG data.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tilemap_common::map::{
    Calibration, Level, MapDescriptor, MapSize, Provider, TileSize,
};
use tilemap_common::{ImportStatus, MapOrigin, ParseError};
use tilemap_importer::{DescriptorLoader, MapImportListener};

/// Write a solid-color image; the format follows the extension
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb([90, 140, 60]))
        .save(path)
        .unwrap();
}

/// Shape of one level: `rows` x `columns` tiles of `tile` pixels
#[derive(Debug, Clone, Copy)]
pub struct LevelSpec {
    pub index: u32,
    pub rows: u32,
    pub columns: u32,
    pub tile: u32,
}

impl LevelSpec {
    pub fn new(index: u32, rows: u32, columns: u32, tile: u32) -> Self {
        Self { index, rows, columns, tile }
    }
}

/// Create `root/<level>/<row>/<column>.<ext>` for every level
pub fn build_pyramid(root: &Path, levels: &[LevelSpec], ext: &str) -> PathBuf {
    for spec in levels {
        for row in 0..spec.rows {
            for column in 0..spec.columns {
                let tile = root
                    .join(spec.index.to_string())
                    .join(row.to_string())
                    .join(format!("{}.{}", column, ext));
                write_image(&tile, spec.tile, spec.tile);
            }
        }
    }
    root.to_path_buf()
}

/// The three-level 256px pyramid: 1x1, 1x2 and 2x2 tiles
pub fn standard_pyramid(root: &Path) -> PathBuf {
    build_pyramid(
        root,
        &[
            LevelSpec::new(0, 1, 1, 256),
            LevelSpec::new(1, 1, 2, 256),
            LevelSpec::new(2, 2, 2, 256),
        ],
        "png",
    )
}

/// Descriptor returned by [`StubLoader`]
pub fn stub_descriptor(root: &Path) -> MapDescriptor {
    MapDescriptor {
        name: "from-loader".to_string(),
        levels: vec![Level { level: 7, tile_size: TileSize::new(512, 512) }],
        provider: Provider {
            generated_by: MapOrigin::Vips,
            image_extension: ".jpg".to_string(),
        },
        size: MapSize { width: 4096, height: 2048 },
        thumbnail: None,
        calibration: Calibration::default(),
        directory: root.to_path_buf(),
    }
}

/// Loader returning a fixed descriptor and counting its calls
#[derive(Clone, Default)]
pub struct StubLoader {
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub empty: bool,
}

impl DescriptorLoader for StubLoader {
    fn load_maps(&self, root: &Path) -> Vec<MapDescriptor> {
        self.calls.lock().unwrap().push(root.to_path_buf());
        if self.empty {
            Vec::new()
        } else {
            vec![stub_descriptor(root)]
        }
    }
}

/// Listener recording every callback it receives
#[derive(Clone, Default)]
pub struct RecordingListener {
    pub imported: Arc<Mutex<Vec<(MapDescriptor, ImportStatus)>>>,
    pub errors: Arc<Mutex<Vec<ParseError>>>,
}

impl RecordingListener {
    pub fn total_calls(&self) -> usize {
        self.imported.lock().unwrap().len() + self.errors.lock().unwrap().len()
    }
}

impl MapImportListener for RecordingListener {
    fn on_map_imported(self: Box<Self>, descriptor: MapDescriptor, status: ImportStatus) {
        self.imported.lock().unwrap().push((descriptor, status));
    }

    fn on_map_import_error(self: Box<Self>, error: ParseError) {
        self.errors.lock().unwrap().push(error);
    }
}
