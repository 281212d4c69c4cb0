//! Image asset loader
//!
//! Resolves asset paths against a list of search directories and reads the
//! image header with the `image` crate. Only the dimensions are kept; the
//! host decodes pixels itself when it paints.

use crate::assets::{AssetError, AssetLoader, LoadedAsset};
use std::path::{Path, PathBuf};

/// Loads image assets from disk
#[derive(Debug, Clone)]
pub struct ImageAssetLoader {
    search_paths: Vec<PathBuf>,
}

impl ImageAssetLoader {
    /// Create a loader searching the given directories in order
    pub fn new<P: AsRef<Path>>(search_paths: &[P]) -> Self {
        Self {
            search_paths: search_paths.iter().map(|path| path.as_ref().to_path_buf()).collect(),
        }
    }

    /// First existing candidate for `path`
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.exists())
    }
}

impl AssetLoader for ImageAssetLoader {
    fn load(&self, path: &str) -> Result<LoadedAsset, AssetError> {
        let full_path = self.resolve(path).ok_or_else(|| AssetError::NotFound(path.to_string()))?;

        log::debug!("Loading image from: {:?}", full_path);
        let (width, height) = image::image_dimensions(&full_path).map_err(|e| AssetError::LoadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        log::info!("Loaded image {}x{} from {:?}", width, height, full_path);

        Ok(LoadedAsset {
            path: path.to_string(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_png_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(64, 32).save(dir.path().join("zamboni.png")).unwrap();

        let loader = ImageAssetLoader::new(&[dir.path()]);
        let asset = loader.load("zamboni.png").unwrap();
        assert_eq!((asset.width, asset.height), (64, 32));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ImageAssetLoader::new(&[dir.path()]);
        assert_eq!(loader.load("nope.png"), Err(AssetError::NotFound("nope.png".to_string())));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();
        let loader = ImageAssetLoader::new(&[dir.path()]);
        assert!(matches!(loader.load("broken.png"), Err(AssetError::LoadFailed { .. })));
    }

    #[test]
    fn test_search_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        image::RgbaImage::new(8, 8).save(second.path().join("ice.png")).unwrap();

        let loader = ImageAssetLoader::new(&[first.path(), second.path()]);
        assert_eq!(loader.resolve("ice.png"), Some(second.path().join("ice.png")));
    }
}
