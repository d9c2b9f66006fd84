//! Image file classification
//!
//! Pure predicates over directory entries. Tiles are raster files whose stem
//! is an integer (`12.png`); thumbnails only need a raster extension.

use std::path::Path;

/// Accepted raster extensions (case-sensitive, without the dot)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "gif", "png", "bmp", "webp"];

/// Return the matching raster extension of a file name, if any
pub fn raster_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    IMAGE_EXTENSIONS.iter().copied().find(|candidate| *candidate == ext)
}

/// True if `name` ends with one of the raster extensions
pub fn is_raster_extension(name: &str) -> bool {
    raster_extension(name).is_some()
}

/// True if `name` looks like a tile: raster extension and an integer stem
pub fn is_tile_name(name: &str) -> bool {
    if !is_raster_extension(name) {
        return false;
    }
    match name.rsplit_once('.') {
        Some((stem, _)) => stem.parse::<i64>().is_ok(),
        None => false,
    }
}

/// True iff `dir/name` is not a directory and is named like a tile
pub fn is_tile_image(dir: &Path, name: &str) -> bool {
    !is_directory_entry(dir, name) && is_tile_name(name)
}

/// True iff `name` may be a thumbnail (the integer-stem rule does not apply)
pub fn is_thumbnail_candidate(name: &str) -> bool {
    is_raster_extension(name)
}

/// True iff `dir/name` is itself a directory
pub fn is_directory_entry(dir: &Path, name: &str) -> bool {
    dir.join(name).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_raster_extension_detection() {
        assert_eq!(raster_extension("0.jpg"), Some("jpg"));
        assert_eq!(raster_extension("tile.webp"), Some("webp"));
        assert_eq!(raster_extension("archive.tar.png"), Some("png"));
        assert!(raster_extension("0.JPG").is_none(), "extensions are case-sensitive");
        assert!(raster_extension("0.jpeg").is_none());
        assert!(raster_extension("map.json").is_none());
        assert!(raster_extension("png").is_none());
        assert_eq!(raster_extension(".png"), Some("png"));
    }

    #[test]
    fn test_tile_name_requires_integer_stem() {
        assert!(is_tile_name("0.png"));
        assert!(is_tile_name("127.jpg"));
        assert!(is_tile_name("3.bmp"));
        assert!(is_tile_name("8.gif"));
        assert!(!is_tile_name("thumbnail.png"));
        assert!(!is_tile_name("1a.png"));
        assert!(!is_tile_name("1.5.png"));
        assert!(!is_tile_name("12.txt"));
        assert!(!is_tile_name(".png"));
    }

    #[test]
    fn test_thumbnail_candidate_ignores_stem() {
        assert!(is_thumbnail_candidate("preview.png"));
        assert!(is_thumbnail_candidate("0.jpg"));
        assert!(!is_thumbnail_candidate("preview.tiff"));
    }

    #[test]
    fn test_tile_image_excludes_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("4.png")).unwrap();
        fs::write(dir.path().join("5.png"), b"").unwrap();

        assert!(is_directory_entry(dir.path(), "4.png"));
        assert!(!is_tile_image(dir.path(), "4.png"));
        assert!(is_tile_image(dir.path(), "5.png"));
        assert!(!is_directory_entry(dir.path(), "5.png"));
    }
}
