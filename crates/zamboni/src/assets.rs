//! Sprite atlas
//!
//! Maps sprite names to a tile of a sprite sheet. Showing a sprite also sizes
//! the entity to the tile, so the collision box always matches what is drawn.

use crate::config::{AssetConfig, AssetSource};
use arcade_engine::assets::{AssetLoader, ImageAssetLoader, PreloadedAssets};
use arcade_engine::ecs::components::set_sprite;
use arcade_engine::ecs::{AttrKey, EntityId, World};
use arcade_engine::foundation::math::Rect;
use arcade_engine::{EngineError, EngineResult};
use std::collections::HashMap;
use std::rc::Rc;

/// Location of one sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    /// Image the sprite lives in
    pub image: String,
    /// Source rectangle in pixels
    pub source: Rect,
}

/// Sprite name lookup built from the configured sheets
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    frames: HashMap<String, SpriteFrame>,
}

impl SpriteAtlas {
    /// Build the atlas from the asset configuration
    pub fn from_config(config: &AssetConfig) -> Self {
        let mut frames = HashMap::new();
        for sheet in &config.sheets {
            let tile = sheet.tile as f32;
            for cell in &sheet.sprites {
                let source = Rect::new(cell.column as f32 * tile, cell.row as f32 * tile, tile, tile);
                if frames
                    .insert(cell.name.clone(), SpriteFrame { image: sheet.image.clone(), source })
                    .is_some()
                {
                    log::warn!("Sprite '{}' defined twice, keeping the one from {}", cell.name, sheet.image);
                }
            }
        }
        Self { frames }
    }

    /// Look up a sprite
    pub fn get(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames.get(name)
    }

    /// Number of sprites
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the atlas is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Show a sprite on an entity and size the entity to it
    pub fn show(&self, world: &mut World, entity: EntityId, name: &str) -> EngineResult<()> {
        let frame = self
            .get(name)
            .ok_or_else(|| EngineError::ApplicationError(format!("Unknown sprite '{name}'")))?;
        set_sprite(world, entity, name)?;
        world.set_attr(entity, AttrKey::W, frame.source.w)?;
        world.set_attr(entity, AttrKey::H, frame.source.h)
    }
}

/// The loader matching the configured asset source
pub fn loader_for(config: &AssetConfig) -> Rc<dyn AssetLoader> {
    match config.source {
        AssetSource::Disk => Rc::new(ImageAssetLoader::new(config.search_paths.as_slice())),
        AssetSource::Bundled => Rc::new(bundled(config)),
    }
}

/// Image sizes implied by the sprite sheets
pub fn bundled(config: &AssetConfig) -> PreloadedAssets {
    config.sheets.iter().fold(PreloadedAssets::new(), |assets, sheet| {
        let columns = sheet.sprites.iter().map(|cell| cell.column + 1).max().unwrap_or(1);
        let rows = sheet.sprites.iter().map(|cell| cell.row + 1).max().unwrap_or(1);
        assets.with(sheet.image.clone(), columns * sheet.tile, rows * sheet.tile)
    })
}
