//! Map descriptor model
//!
//! The descriptor is the structured summary of a tile pyramid laid out as
//! `root/<level>/<row>/<column>.<ext>`. It is either synthesized by the importer
//! or loaded from a `map.json` file already present at the pyramid root.
//!
//! JSON field names follow the descriptor file format (`tile_size.x`,
//! `provider.generated_by`, ...) so a serialized descriptor can be read back
//! by the descriptor loader unchanged.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved file name of a persisted descriptor, directly under the pyramid root
pub const MAP_FILE_NAME: &str = "map.json";

// ============================================================================
// Sizes and levels
// ============================================================================

/// Pixel dimensions of one tile
///
/// Assumed constant within a level; sampled from exactly one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    #[serde(rename = "x")]
    pub width: u32,
    #[serde(rename = "y")]
    pub height: u32,
}

impl TileSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Total pixel extent of the pyramid, computed from its deepest level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSize {
    #[serde(rename = "x")]
    pub width: u32,
    #[serde(rename = "y")]
    pub height: u32,
}

/// One zoom level; `level` is the numeric folder name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub level: u32,
    pub tile_size: TileSize,
}

// ============================================================================
// Provider and calibration
// ============================================================================

/// Tiling tool that produced a pyramid; selects the matching parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapOrigin {
    /// libvips `dzsave --layout google`
    Vips,
}

impl std::fmt::Display for MapOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapOrigin::Vips => write!(f, "VIPS"),
        }
    }
}

/// Which parser produced the descriptor and the detected raster extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub generated_by: MapOrigin,
    /// Extension including the leading dot, e.g. `.jpg`
    pub image_extension: String,
}

/// Scheme mapping pixel coordinates to geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalibrationMethod {
    #[default]
    #[serde(rename = "SIMPLE_2_POINTS")]
    Simple2Points,
    #[serde(rename = "CALIBRATION_3_POINTS")]
    Calibration3Points,
    #[serde(rename = "CALIBRATION_4_POINTS")]
    Calibration4Points,
}

/// Calibration settings; points are computed elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Calibration {
    #[serde(default)]
    pub calibration_method: CalibrationMethod,
}

// ============================================================================
// Descriptor
// ============================================================================

/// Structured summary of a tile pyramid
///
/// Invariants for an imported descriptor:
/// - `levels` is non-empty and ascending by index (gaps allowed)
/// - `size` is the deepest level's column/row count times its tile size
/// - `thumbnail`, when set, names a 256x256 image directly under the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    pub name: String,
    pub levels: Vec<Level>,
    pub provider: Provider,
    pub size: MapSize,
    /// Thumbnail file name, relative to the pyramid root
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub calibration: Calibration,
    /// Pyramid root this descriptor describes (not persisted)
    #[serde(skip)]
    pub directory: PathBuf,
}

impl MapDescriptor {
    /// Location of the descriptor file for this map
    pub fn descriptor_file(&self) -> PathBuf {
        self.directory.join(MAP_FILE_NAME)
    }

    /// Absolute path of the thumbnail image, if any
    pub fn thumbnail_path(&self) -> Option<PathBuf> {
        self.thumbnail.as_ref().map(|name| self.directory.join(name))
    }

    /// Highest-index (finest resolution) level
    pub fn deepest_level(&self) -> Option<&Level> {
        self.levels.last()
    }

    /// Attach the pyramid root, e.g. after deserializing a descriptor file
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }
}

// ============================================================================
// Import outcome
// ============================================================================

/// Result status of an import
///
/// `NoMap` only exists before a parser has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    /// No map could be created (yet)
    #[default]
    NoMap,
    /// A new descriptor was computed from the directory layout
    NewMap,
    /// A `map.json` file was found and loaded
    ExistingMap,
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ImportStatus::NoMap => "NO_MAP",
            ImportStatus::NewMap => "NEW_MAP",
            ImportStatus::ExistingMap => "EXISTING_MAP",
        };
        write!(f, "{}", s)
    }
}

/// Terminal import failure; no partial descriptor accompanies it
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseError {
    /// Input path is not a directory
    #[error("Not a directory")]
    NotADirectory,

    /// No tile was found, or the tile has no level/row ancestors
    #[error("No parent folder found for the tile pyramid")]
    NoParentFolderFound,

    /// No zoom level could be discovered
    #[error("No level found")]
    NoLevelFound,

    /// Reserved; no current code path raises it
    #[error("Unknown image extension")]
    UnknownImageExtension,

    /// The deepest level has no rows or no tiles in its first row
    #[error("Map size incorrect")]
    MapSizeIncorrect,

    /// The import was cancelled before it finished
    #[error("Import cancelled")]
    Cancelled,

    /// The background worker terminated abnormally
    #[error("Import worker failed: {0}")]
    WorkerFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MapDescriptor {
        MapDescriptor {
            name: "alps".to_string(),
            levels: vec![
                Level { level: 0, tile_size: TileSize::new(256, 256) },
                Level { level: 2, tile_size: TileSize::new(256, 256) },
            ],
            provider: Provider {
                generated_by: MapOrigin::Vips,
                image_extension: ".jpg".to_string(),
            },
            size: MapSize { width: 512, height: 768 },
            thumbnail: Some("alps.png".to_string()),
            calibration: Calibration::default(),
            directory: PathBuf::from("/maps/alps"),
        }
    }

    #[test]
    fn test_descriptor_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["levels"][1]["level"], 2);
        assert_eq!(json["levels"][0]["tile_size"]["x"], 256);
        assert_eq!(json["provider"]["generated_by"], "VIPS");
        assert_eq!(json["provider"]["image_extension"], ".jpg");
        assert_eq!(json["size"]["y"], 768);
        assert_eq!(json["calibration"]["calibration_method"], "SIMPLE_2_POINTS");
        assert!(json.get("directory").is_none(), "directory must not be persisted");
    }

    #[test]
    fn test_descriptor_paths() {
        let map = sample();
        assert_eq!(map.descriptor_file(), PathBuf::from("/maps/alps/map.json"));
        assert_eq!(map.thumbnail_path(), Some(PathBuf::from("/maps/alps/alps.png")));
        assert_eq!(map.deepest_level().map(|l| l.level), Some(2));
    }

    #[test]
    fn test_descriptor_without_optional_fields() {
        let json = r#"{
            "name": "bare",
            "levels": [{"level": 0, "tile_size": {"x": 512, "y": 512}}],
            "provider": {"generated_by": "VIPS", "image_extension": ".png"},
            "size": {"x": 512, "y": 512}
        }"#;

        let map: MapDescriptor = serde_json::from_str(json).unwrap();
        let map = map.with_directory("/maps/bare");

        assert!(map.thumbnail.is_none());
        assert_eq!(map.calibration.calibration_method, CalibrationMethod::Simple2Points);
        assert_eq!(map.directory, PathBuf::from("/maps/bare"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ImportStatus::default(), ImportStatus::NoMap);
        assert_eq!(ImportStatus::NewMap.to_string(), "NEW_MAP");
        assert_eq!(ImportStatus::ExistingMap.to_string(), "EXISTING_MAP");
    }

    #[test]
    fn test_parse_error_wire_names() {
        assert_eq!(
            serde_json::to_value(ParseError::UnknownImageExtension).unwrap(),
            "UNKNOWN_IMAGE_EXTENSION"
        );
        assert_eq!(
            serde_json::to_value(ParseError::NoParentFolderFound).unwrap(),
            "NO_PARENT_FOLDER_FOUND"
        );
        assert_eq!(
            ParseError::UnknownImageExtension.to_string(),
            "Unknown image extension"
        );
    }
}
