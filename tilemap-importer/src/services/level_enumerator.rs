//! Zoom level enumeration
//!
//! Levels are the immediate subfolders of the pyramid root named with a
//! non-negative integer. Other folders are ignored. Missing indices between 0
//! and the maximum level are skipped, not treated as malformed input.

use super::listing::{file_name, subdirectories};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tilemap_common::ParseError;

/// Discovered levels of a pyramid root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelScan {
    /// Level directories in ascending index order
    pub levels: Vec<(u32, PathBuf)>,
    /// Greatest index seen
    pub max_level: u32,
}

impl LevelScan {
    /// Deepest (highest index, finest resolution) level
    pub fn deepest(&self) -> Option<&(u32, PathBuf)> {
        self.levels.last()
    }
}

/// List the level folders of `root`
///
/// Fails with `NoLevelFound` when no subfolder parses as a level index.
pub fn enumerate_levels(root: &Path) -> Result<LevelScan, ParseError> {
    let mut found: BTreeMap<u32, PathBuf> = BTreeMap::new();

    for dir in subdirectories(root) {
        let index = match file_name(&dir) {
            // Only the canonical spelling names a level: "007" is not level 7
            Some(name) => match name.parse::<u32>() {
                Ok(index) if index.to_string() == name => Some(index),
                _ => {
                    tracing::debug!(folder = name, "Ignoring non-level folder");
                    None
                }
            },
            None => None,
        };
        if let Some(index) = index {
            found.insert(index, dir);
        }
    }

    let Some(&max_level) = found.keys().next_back() else {
        return Err(ParseError::NoLevelFound);
    };

    let missing = (max_level as usize)
        .saturating_add(1)
        .saturating_sub(found.len());
    if missing > 0 {
        tracing::debug!(
            max_level,
            missing,
            "Skipping missing intermediate levels"
        );
    }

    Ok(LevelScan {
        levels: found.into_iter().collect(),
        max_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_levels_are_sorted_numerically() {
        let dir = TempDir::new().unwrap();
        for name in ["10", "2", "0", "1"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let scan = enumerate_levels(dir.path()).unwrap();
        let indices: Vec<u32> = scan.levels.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 10]);
        assert_eq!(scan.max_level, 10);
        assert_eq!(scan.deepest().unwrap().1, dir.path().join("10"));
    }

    #[test]
    fn test_unknown_folders_and_files_ignored() {
        let dir = TempDir::new().unwrap();
        for name in ["tiles", "-1", "007", "3"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("5"), b"not a folder").unwrap();

        let scan = enumerate_levels(dir.path()).unwrap();
        assert_eq!(scan.levels.len(), 1);
        assert_eq!(scan.levels[0].0, 3);
        assert_eq!(scan.max_level, 3);
    }

    #[test]
    fn test_no_numeric_folder_is_no_level_found() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();

        assert_eq!(enumerate_levels(dir.path()), Err(ParseError::NoLevelFound));
    }
}
