//! Deterministic directory listings
//!
//! Every listing used by the importer is sorted by file name so that "the
//! first row folder" or "the first tile" means the same thing on every
//! filesystem. Unreadable directories list as empty.

use super::classifier;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Immediate children of a directory, split by kind, sorted by name
#[derive(Debug, Default, Clone)]
pub struct DirListing {
    pub dir: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl DirListing {
    /// List the immediate children of `dir`
    ///
    /// Symlinks are followed so a linked row folder counts as a directory.
    pub fn read(dir: &Path) -> Self {
        let mut listing = DirListing {
            dir: dir.to_path_buf(),
            ..DirListing::default()
        };

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let Some(name) = entry.file_name().to_str() else {
                        continue;
                    };
                    if classifier::is_directory_entry(dir, name) {
                        listing.directories.push(entry.into_path());
                    } else if entry.file_type().is_file() {
                        listing.files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    tracing::warn!(directory = %dir.display(), "Error listing entry: {}", e);
                }
            }
        }

        listing
    }

    /// Files named like tiles (`<int>.<ext>`)
    pub fn tile_images(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().filter(|path| {
            file_name(path).is_some_and(|name| classifier::is_tile_image(&self.dir, name))
        })
    }

    /// Files with a raster extension
    pub fn thumbnail_candidates(&self) -> impl Iterator<Item = &PathBuf> {
        self.files
            .iter()
            .filter(|path| file_name(path).is_some_and(classifier::is_thumbnail_candidate))
    }
}

/// Immediate subdirectories of `dir`, sorted by name
pub fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    DirListing::read(dir).directories
}

/// Tile images directly inside `dir`, sorted by name
pub fn tile_images(dir: &Path) -> Vec<PathBuf> {
    DirListing::read(dir).tile_images().cloned().collect()
}

/// UTF-8 file name of a path, if it has one
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_listing_is_sorted_and_split() {
        let dir = TempDir::new().unwrap();
        for name in ["b", "a", "10"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        for name in ["2.png", "1.png", "notes.txt", "cover.jpg"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let listing = DirListing::read(dir.path());
        let dirs: Vec<_> = listing.directories.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(dirs, vec!["10", "a", "b"]);

        let tiles: Vec<_> = listing.tile_images().filter_map(|p| file_name(p)).collect();
        assert_eq!(tiles, vec!["1.png", "2.png"]);

        let thumbs: Vec<_> = listing
            .thumbnail_candidates()
            .filter_map(|p| file_name(p))
            .collect();
        assert_eq!(thumbs, vec!["1.png", "2.png", "cover.jpg"]);
    }

    #[test]
    fn test_tile_named_folder_is_not_a_tile() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("0.png")).unwrap();
        fs::write(dir.path().join("1.png"), b"").unwrap();

        let listing = DirListing::read(dir.path());
        let tiles: Vec<_> = listing.tile_images().filter_map(|p| file_name(p)).collect();
        assert_eq!(tiles, vec!["1.png"]);
        assert_eq!(listing.directories, vec![dir.path().join("0.png")]);
    }

    #[test]
    fn test_missing_directory_lists_empty() {
        let listing = DirListing::read(Path::new("/nonexistent/tilemap/dir"));
        assert!(listing.directories.is_empty());
        assert!(listing.files.is_empty());
    }
}
