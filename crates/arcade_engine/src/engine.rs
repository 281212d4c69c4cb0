//! Core engine implementation

use crate::{
    application::Application,
    config::{Config, ConfigError},
    ecs::{
        attributes::AttrKey, ComponentDef, ComponentTable, EntityId, FrameScheduler, RenderItem, SceneManager,
        TickReport, World,
    },
    foundation::time::Timer,
    input::InputState,
    physics::CollisionDetector,
    spatial::BroadPhaseKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Supplies frames to [`Engine::run`]
///
/// The host owns the real clock and devices. Each call returns the time since
/// the previous frame and the input sampled for it, or `None` to stop.
pub trait FrameSource {
    /// Next frame delta (seconds) and input snapshot
    fn next_frame(&mut self) -> Option<(f32, InputState)>;

    /// Paint the world after a tick
    fn present(&mut self, _items: &[RenderItem]) {}
}

/// Main engine struct
///
/// Owns the world and drives it: ticks go through the frame scheduler, scene
/// transitions requested during a tick are applied right after it.
pub struct Engine {
    world: World,
    scenes: SceneManager,
    scheduler: FrameScheduler,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        log::info!("Initializing engine (seed {}, broad phase {:?})", config.seed, config.broad_phase);

        let world = World::with_components(ComponentTable::with_builtins()?, config.seed);
        let scheduler = FrameScheduler::new(CollisionDetector::from_kind(config.broad_phase));

        Ok(Self {
            world,
            scenes: SceneManager::new(),
            scheduler,
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<A: Application, F: FrameSource>(config: EngineConfig, app: &mut A, frames: &mut F) -> EngineResult<()> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let mut timer = Timer::new();

        while engine.running {
            let Some((delta_time, input)) = frames.next_frame() else {
                break;
            };
            let report = engine.tick(delta_time, &input)?;

            app.update(&mut engine, &report)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            frames.present(&engine.world.render_snapshot());
            timer.update();
        }

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete ({} frames, {:.1} fps average)",
            timer.frame_count(),
            timer.average_fps()
        );
        Ok(())
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, delta_time: f32, input: &InputState) -> EngineResult<TickReport> {
        let report = self.scheduler.tick(&mut self.world, delta_time, input)?;
        self.scenes.apply_pending(&mut self.world)?;
        Ok(report)
    }

    /// Register a game component
    pub fn register_component(&mut self, name: impl Into<String>, def: ComponentDef) -> EngineResult<()> {
        self.world.register_component(name, def)
    }

    /// Register a scene
    pub fn register_scene(
        &mut self,
        name: impl Into<String>,
        setup: impl Fn(&mut World) -> EngineResult<()> + 'static,
    ) -> EngineResult<()> {
        self.scenes.register(name, setup)
    }

    /// Enter a scene immediately
    pub fn enter_scene(&mut self, name: &str) -> EngineResult<()> {
        self.scenes.enter(&mut self.world, name)
    }

    /// Name of the active scene
    pub fn current_scene(&self) -> Option<&str> {
        self.scenes.current()
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick_count()
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the world's random number generator
    pub seed: u64,
    /// Broad-phase collision strategy
    pub broad_phase: BroadPhaseKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            broad_phase: BroadPhaseKind::default(),
        }
    }
}

impl Config for EngineConfig {}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// No component registered under this name
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// A component with this name is already registered
    #[error("Component already registered: {0}")]
    DuplicateComponent(String),

    /// The entity does not exist (never created or already destroyed)
    #[error("Invalid entity: {0:?}")]
    InvalidEntity(EntityId),

    /// Two components claim the same attribute key
    #[error("{claimant} cannot own {key:?} on {entity:?}: already owned by {owner}")]
    AttributeConflict {
        /// Entity being attached to
        entity: EntityId,
        /// Contested key
        key: AttrKey,
        /// Component that owns the key
        owner: String,
        /// Component that tried to claim it
        claimant: String,
    },

    /// No attached component owns this key
    #[error("No component on {entity:?} owns {key:?}")]
    UnownedAttribute {
        /// Entity
        entity: EntityId,
        /// Key
        key: AttrKey,
    },

    /// The entity has no value for this key
    #[error("Entity {entity:?} has no attribute {key:?}")]
    MissingAttribute {
        /// Entity
        entity: EntityId,
        /// Key
        key: AttrKey,
    },

    /// The stored value has a different type
    #[error("Attribute {key:?} on {entity:?} is not a {expected}")]
    AttributeType {
        /// Entity
        entity: EntityId,
        /// Key
        key: AttrKey,
        /// Requested type
        expected: &'static str,
    },

    /// No scene registered under this name
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// A scene with this name is already registered
    #[error("Scene already registered: {0}")]
    DuplicateScene(String),

    /// Frame delta was negative or not finite
    #[error("Invalid frame delta: {0}")]
    InvalidDelta(f32),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error raised by application code
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::config::ConfigFormat;
    use crate::ecs::components::SPATIAL;

    struct Frames {
        remaining: usize,
    }

    impl FrameSource for Frames {
        fn next_frame(&mut self) -> Option<(f32, InputState)> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            Some((0.25, InputState::new()))
        }
    }

    #[derive(Default)]
    struct CountingApp {
        updates: u64,
        cleaned_up: bool,
    }

    impl Application for CountingApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            engine.register_scene("only", |world| world.spawn(&[SPATIAL]).map(|_| ()))?;
            engine.enter_scene("only")?;
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, report: &TickReport) -> Result<(), AppError> {
            self.updates = report.tick;
            if engine.world().elapsed() >= 1.0 {
                engine.quit();
            }
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_run_until_quit() {
        let mut app = CountingApp::default();
        Engine::run(EngineConfig::default(), &mut app, &mut Frames { remaining: 100 }).unwrap();
        assert_eq!(app.updates, 4);
        assert!(app.cleaned_up);
    }

    #[test]
    fn test_run_until_frames_run_out() {
        let mut app = CountingApp::default();
        Engine::run(EngineConfig::default(), &mut app, &mut Frames { remaining: 2 }).unwrap();
        assert_eq!(app.updates, 2);
    }

    #[test]
    fn test_scene_request_applied_after_tick() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.register_scene("a", |world| {
            let entity = world.spawn(&[SPATIAL])?;
            world.delay(entity, 0.1, |world, _| {
                world.request_scene("b");
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
        engine.register_scene("b", |_| Ok(())).unwrap();
        engine.enter_scene("a").unwrap();

        engine.tick(0.05, &InputState::new()).unwrap();
        assert_eq!(engine.current_scene(), Some("a"));
        engine.tick(0.05, &InputState::new()).unwrap();
        assert_eq!(engine.current_scene(), Some("b"));
        assert_eq!(engine.world().entity_count(), 0);
    }

    #[test]
    fn test_config_parses() {
        let config = EngineConfig::from_str_as(
            "seed = 42\n\n[broad_phase]\nkind = \"brute_force\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.broad_phase, BroadPhaseKind::BruteForce);
    }
}
