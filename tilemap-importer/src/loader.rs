//! Existing descriptor loading
//!
//! When a pyramid root already holds a `map.json`, the importer defers to a
//! [`DescriptorLoader`] instead of recomputing anything. The loader is a
//! collaborator injected into the importer; [`JsonDescriptorLoader`] reads the
//! descriptor file with serde_json.

use std::path::Path;
use tilemap_common::map::{MapDescriptor, MAP_FILE_NAME};
use tilemap_common::Result;

/// Produces descriptors for a pyramid root that already has a descriptor file
pub trait DescriptorLoader: Send + Sync {
    /// Load zero or more descriptors for `root`
    ///
    /// An empty result makes the importer fall back to a fresh computation.
    fn load_maps(&self, root: &Path) -> Vec<MapDescriptor>;
}

/// Reads `<root>/map.json`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDescriptorLoader;

impl JsonDescriptorLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse the descriptor file of `root`
    pub fn read(root: &Path) -> Result<MapDescriptor> {
        let content = std::fs::read_to_string(root.join(MAP_FILE_NAME))?;
        let descriptor: MapDescriptor = serde_json::from_str(&content)?;
        Ok(descriptor.with_directory(root))
    }
}

impl DescriptorLoader for JsonDescriptorLoader {
    fn load_maps(&self, root: &Path) -> Vec<MapDescriptor> {
        match Self::read(root) {
            Ok(descriptor) => {
                tracing::debug!(root = %root.display(), name = %descriptor.name, "Loaded existing descriptor");
                vec![descriptor]
            }
            Err(e) => {
                tracing::warn!(root = %root.display(), "Unusable descriptor file: {}", e);
                Vec::new()
            }
        }
    }
}
