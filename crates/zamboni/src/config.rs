//! Game configuration
//!
//! Everything tunable lives here: window and arena geometry, the asset list
//! and sprite sheets, speeds, and each player's controls. Loaded from
//! `zamboni.toml` (or `.ron`) through the engine's [`Config`] trait; missing
//! sections fall back to the defaults below.

use arcade_engine::config::{Config, ConfigError};
use arcade_engine::foundation::math::{Rect, Vec2};
use arcade_engine::input::Controls;
use arcade_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings (seed, broad phase)
    pub engine: EngineConfig,

    /// Window settings
    pub window: WindowConfig,

    /// Assets and sprite sheets
    pub assets: AssetConfig,

    /// Loading scene settings
    pub loading: LoadingConfig,

    /// Main scene arena settings
    pub arena: ArenaConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// One entry per player
    pub players: Vec<PlayerConfig>,

    /// Headless demo run
    pub demo: DemoConfig,
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width
    pub width: f32,

    /// Window height
    pub height: f32,
}

/// Where images come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSource {
    /// Read image headers from disk under the search paths
    Disk,
    /// Images are bundled with the host; sizes come from the sprite sheets
    Bundled,
}

/// Asset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Where images come from
    pub source: AssetSource,

    /// Directories searched for images
    pub search_paths: Vec<String>,

    /// Sprite sheets; their images make up the load list
    pub sheets: Vec<SpriteSheet>,
}

/// A grid of equally sized sprites in one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Image path
    pub image: String,

    /// Edge length of one tile in pixels
    pub tile: u32,

    /// Named tiles
    pub sprites: Vec<SpriteCell>,
}

/// A named tile in a sprite sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCell {
    /// Sprite name
    pub name: String,

    /// Tile column
    pub column: u32,

    /// Tile row
    pub row: u32,
}

/// Loading scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Where the status text goes
    pub label: Rect,

    /// Seconds between a successful load and the switch to the main scene
    pub switch_delay: f32,
}

/// Main scene arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Players must stay fully inside this rectangle
    pub player_bounds: Rect,

    /// Ice spawns with its left edge in `[x, x + w)` and fully inside vertically
    pub ice_spawn: Rect,

    /// Number of ice targets
    pub ice_count: u32,

    /// Seconds an ice target stays hidden after a hit
    pub respawn_delay: f32,

    /// X coordinate hidden ice is parked at
    pub off_screen_x: f32,
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Player speed in units per second
    pub player_speed: f32,

    /// Explosion fade in alpha per second
    pub fade_speed: f32,

    /// Alpha below which a fading entity is removed
    pub visibility_threshold: f32,

    /// Ice rotation in degrees per second
    pub ice_rotation_speed: f32,

    /// Sprites an ice target picks from
    pub ice_sprites: Vec<String>,

    /// Sprites an explosion picks from
    pub explosion_sprites: Vec<String>,

    /// Bullet sprite
    pub bullet_sprite: String,

    /// Bullet speed in units per second (upwards)
    pub bullet_speed: f32,

    /// Bullet lifetime in seconds
    pub bullet_lifetime: f32,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Player sprite
    pub sprite: String,

    /// Start position
    pub spawn: Vec2,

    /// Where this player's scoreboard sits
    pub scoreboard: Rect,

    /// Movement and fire bindings
    pub controls: Controls,
}

/// Scripted input for the headless demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to run
    pub frames: u64,

    /// Fixed frame delta in seconds
    pub delta: f32,

    /// Input changes, applied in frame order
    pub steps: Vec<DemoStep>,
}

/// Input change at a given frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoStep {
    /// Frame number, starting at 0
    pub frame: u64,

    /// Actions that start being held
    #[serde(default)]
    pub hold: Vec<String>,

    /// Actions that stop being held
    #[serde(default)]
    pub release: Vec<String>,

    /// Discrete presses
    #[serde(default)]
    pub press: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
            loading: LoadingConfig::default(),
            arena: ArenaConfig::default(),
            gameplay: GameplayConfig::default(),
            players: PlayerConfig::defaults(),
            demo: DemoConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        let single = |image: &str, tile: u32, name: &str| SpriteSheet {
            image: image.to_string(),
            tile,
            sprites: vec![SpriteCell::new(name, 0, 0)],
        };
        Self {
            source: AssetSource::Bundled,
            search_paths: vec![".".to_string()],
            sheets: vec![
                single("img/zamboni-sprite.png", 64, "player1"),
                single("img/zamboni-sprite2.png", 64, "player2"),
                single("img/crack1.png", 32, "crack1"),
                single("img/crack2.png", 32, "crack2"),
                single("img/crack3.png", 32, "crack3"),
                single("img/crack4.png", 32, "crack4"),
                SpriteSheet {
                    image: "img/effects.png".to_string(),
                    tile: 32,
                    sprites: vec![
                        SpriteCell::new("explosion1", 0, 0),
                        SpriteCell::new("explosion2", 1, 0),
                        SpriteCell::new("bullet", 2, 0),
                    ],
                },
            ],
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            label: Rect::new(512.0, 200.0, 100.0, 20.0),
            switch_delay: 0.5,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player_bounds: Rect::new(90.0, 65.0, 800.0, 490.0),
            ice_spawn: Rect::new(0.0, 0.0, 700.0, 500.0),
            ice_count: 5,
            respawn_delay: 1.0,
            off_screen_x: -2000.0,
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            player_speed: 300.0,
            fade_speed: 6.0,
            visibility_threshold: 0.05,
            ice_rotation_speed: 0.0,
            ice_sprites: ["crack1", "crack2", "crack3", "crack4"].map(String::from).to_vec(),
            explosion_sprites: ["explosion1", "explosion2"].map(String::from).to_vec(),
            bullet_sprite: "bullet".to_string(),
            bullet_speed: 600.0,
            bullet_lifetime: 1.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        let step = |frame: u64, hold: &[&str], release: &[&str], press: &[&str]| DemoStep {
            frame,
            hold: hold.iter().map(|s| (*s).to_string()).collect(),
            release: release.iter().map(|s| (*s).to_string()).collect(),
            press: press.iter().map(|s| (*s).to_string()).collect(),
        };
        Self {
            frames: 600,
            delta: 1.0 / 60.0,
            steps: vec![
                step(60, &["p1.right", "p2.left"], &[], &[]),
                step(180, &["p1.down"], &["p1.right"], &["p1.fire"]),
                step(300, &["p2.up"], &["p2.left", "p1.down"], &["p2.fire"]),
                step(420, &["p1.left"], &["p2.up"], &[]),
            ],
        }
    }
}

impl SpriteCell {
    /// Create a named tile
    pub fn new(name: &str, column: u32, row: u32) -> Self {
        Self {
            name: name.to_string(),
            column,
            row,
        }
    }
}

impl PlayerConfig {
    /// The two default players: WASD on the left, arrow keys on the right
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                sprite: "player1".to_string(),
                spawn: Vec2::new(110.0, 300.0),
                scoreboard: Rect::new(100.0, 0.0, 100.0, 20.0),
                controls: Controls::four_way("p1.up", "p1.down", "p1.right", "p1.left").with_fire("p1.fire"),
            },
            Self {
                sprite: "player2".to_string(),
                spawn: Vec2::new(700.0, 300.0),
                scoreboard: Rect::new(900.0, 0.0, 100.0, 20.0),
                controls: Controls::four_way("p2.up", "p2.down", "p2.right", "p2.left").with_fire("p2.fire"),
            },
        ]
    }
}

impl GameConfig {
    /// Screen rectangle
    pub fn screen(&self) -> Rect {
        Rect::new(0.0, 0.0, self.window.width, self.window.height)
    }

    /// Images to load, in sheet order
    pub fn images(&self) -> Vec<String> {
        self.assets.sheets.iter().map(|sheet| sheet.image.clone()).collect()
    }

    /// Check values that parse fine but cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        let known = |name: &str| {
            self.assets
                .sheets
                .iter()
                .any(|sheet| sheet.sprites.iter().any(|cell| cell.name == name))
        };
        let referenced = self
            .players
            .iter()
            .map(|player| &player.sprite)
            .chain(&self.gameplay.ice_sprites)
            .chain(&self.gameplay.explosion_sprites)
            .chain(std::iter::once(&self.gameplay.bullet_sprite));
        for name in referenced {
            if !known(name) {
                return Err(ConfigError::Invalid(format!("sprite '{name}' is not in any sprite sheet")));
            }
        }
        if self.players.is_empty() {
            return Err(ConfigError::Invalid("at least one player is required".to_string()));
        }
        if self.gameplay.ice_sprites.is_empty() || self.gameplay.explosion_sprites.is_empty() {
            return Err(ConfigError::Invalid("ice and explosion sprite lists must not be empty".to_string()));
        }
        if self.arena.player_bounds.w <= 0.0 || self.arena.player_bounds.h <= 0.0 {
            return Err(ConfigError::Invalid("player bounds must have a positive size".to_string()));
        }
        let ice_tile = self
            .assets
            .sheets
            .iter()
            .filter(|sheet| sheet.sprites.iter().any(|cell| self.gameplay.ice_sprites.contains(&cell.name)))
            .map(|sheet| sheet.tile as f32)
            .fold(0.0, f32::max);
        let parked_x = self.arena.off_screen_x;
        if !parked_x.is_finite() || (parked_x + ice_tile > 0.0 && parked_x < self.window.width) {
            return Err(ConfigError::Invalid(format!(
                "off_screen_x {parked_x} puts a {ice_tile}px ice block on screen"
            )));
        }
        if !(self.gameplay.fade_speed.is_finite() && self.gameplay.fade_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fade speed must be positive, got {}",
                self.gameplay.fade_speed
            )));
        }
        let threshold = self.gameplay.visibility_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!("visibility threshold must be in (0, 1], got {threshold}")));
        }
        if !(self.demo.delta.is_finite() && self.demo.delta > 0.0) {
            return Err(ConfigError::Invalid(format!("demo delta must be positive, got {}", self.demo.delta)));
        }
        Ok(())
    }
}

impl Config for GameConfig {}
