//! Asset loading contract
//!
//! The engine has no opinion on formats. A loader walks a list of asset
//! paths and reports to a [`LoadObserver`]: progress after every item, an
//! error for every item that fails, and completion once everything loaded.
//! Failures are values for the caller to display, never fatal.

pub mod image_loader;

pub use image_loader::ImageAssetLoader;

use std::collections::HashMap;
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// Not present in any search path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Present but could not be read
    #[error("Failed to load {path}: {reason}")]
    LoadFailed {
        /// Requested path
        path: String,
        /// Decoder or IO message
        reason: String,
    },
}

/// A successfully loaded asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAsset {
    /// Requested path
    pub path: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Progress of a batch load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Items processed so far, failed ones included
    pub processed: usize,
    /// Items in the batch
    pub total: usize,
}

impl LoadProgress {
    /// Whole percent complete; an empty batch is complete
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.processed * 100 / self.total) as u32
    }
}

/// Receives the outcome of a batch load
pub trait LoadObserver {
    /// Called after every item, successful or not
    fn on_progress(&mut self, progress: LoadProgress);

    /// Called for every item that failed
    fn on_error(&mut self, error: &AssetError);

    /// Called once at the end if every item loaded
    fn on_complete(&mut self, assets: &[LoadedAsset]);
}

/// Loads a batch of assets
pub trait AssetLoader {
    /// Load one asset
    fn load(&self, path: &str) -> Result<LoadedAsset, AssetError>;

    /// Load every path in order, reporting to `observer`.
    ///
    /// Returns whether the whole batch loaded.
    fn load_assets(&self, paths: &[String], observer: &mut dyn LoadObserver) -> bool {
        let mut loaded = Vec::with_capacity(paths.len());
        let mut failed = 0;
        for (index, path) in paths.iter().enumerate() {
            match self.load(path) {
                Ok(asset) => loaded.push(asset),
                Err(err) => {
                    log::warn!("{err}");
                    failed += 1;
                    observer.on_error(&err);
                }
            }
            observer.on_progress(LoadProgress {
                processed: index + 1,
                total: paths.len(),
            });
        }
        if failed > 0 {
            log::warn!("{failed} of {} assets failed to load", paths.len());
            return false;
        }
        log::info!("Loaded {} assets", loaded.len());
        observer.on_complete(&loaded);
        true
    }
}

/// Loader answering from a fixed table of known assets, for hosts that
/// bundle their images and for tests
#[derive(Debug, Clone, Default)]
pub struct PreloadedAssets {
    sizes: HashMap<String, (u32, u32)>,
}

impl PreloadedAssets {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset with its pixel size (builder pattern)
    pub fn with(mut self, path: impl Into<String>, width: u32, height: u32) -> Self {
        self.sizes.insert(path.into(), (width, height));
        self
    }
}

impl AssetLoader for PreloadedAssets {
    fn load(&self, path: &str) -> Result<LoadedAsset, AssetError> {
        let &(width, height) = self.sizes.get(path).ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        Ok(LoadedAsset {
            path: path.to_string(),
            width,
            height,
        })
    }
}
