//! # Zamboni
//!
//! Two zambonis on a rink drive over cracks in the ice. Every crack driven
//! over scores a point for its driver, leaves a fading explosion behind and
//! reappears somewhere else a second later.
//!
//! The game is a set of components and two scenes on top of `arcade_engine`.
//! [`ZamboniGame`] wires them into the engine's [`Application`] lifecycle.

#![warn(missing_docs)]

pub mod assets;
pub mod components;
pub mod config;
pub mod host;
pub mod scenes;

use crate::assets::SpriteAtlas;
use crate::components::score;
use crate::config::GameConfig;
use arcade_engine::assets::AssetLoader;
use arcade_engine::ecs::{TickReport, World};
use arcade_engine::{AppError, Application, Engine};
use std::rc::Rc;

/// Configuration and sprite lookup shared by every game component
#[derive(Debug, Clone)]
pub struct GameContext {
    /// Game configuration
    pub config: GameConfig,
    /// Sprites built from the configured sheets
    pub atlas: SpriteAtlas,
}

impl GameContext {
    /// Build the context, deriving the atlas from the asset configuration
    pub fn new(config: GameConfig) -> Self {
        let atlas = SpriteAtlas::from_config(&config.assets);
        Self { config, atlas }
    }
}

/// The game
pub struct ZamboniGame {
    context: Rc<GameContext>,
    loader: Rc<dyn AssetLoader>,
    final_scores: Vec<i64>,
}

impl ZamboniGame {
    /// Create the game with the loader the loading scene should use
    pub fn new(config: GameConfig, loader: Rc<dyn AssetLoader>) -> Self {
        Self {
            context: Rc::new(GameContext::new(config)),
            loader,
            final_scores: Vec::new(),
        }
    }

    /// Shared context
    pub fn context(&self) -> &Rc<GameContext> {
        &self.context
    }

    /// Scores captured when the main loop ended, one per scoreboard
    pub fn final_scores(&self) -> &[i64] {
        &self.final_scores
    }
}

impl Application for ZamboniGame {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing zamboni...");
        components::register(engine.world_mut(), &self.context)?;
        scenes::register(engine, &self.context, Rc::clone(&self.loader))?;
        engine.enter_scene(scenes::LOADING)?;
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, report: &TickReport) -> Result<(), AppError> {
        if report.hits > 0 {
            log::debug!("Tick {}: {} hits, scores {:?}", report.tick, report.hits, scores(engine.world()));
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        self.final_scores = scores(engine.world());
        log::info!("Final scores: {:?}", self.final_scores);
    }
}

/// Current score of every scoreboard, in creation order
pub fn scores(world: &World) -> Vec<i64> {
    world
        .with_component(components::SCORE)
        .filter_map(|scoreboard| score::value(world, scoreboard).ok())
        .collect()
}

/// Create an engine for `config` and initialize the game on it
pub fn build_engine(config: GameConfig, loader: Rc<dyn AssetLoader>) -> Result<(Engine, ZamboniGame), AppError> {
    let mut engine = Engine::new(config.engine.clone())?;
    let mut game = ZamboniGame::new(config, loader);
    game.initialize(&mut engine)?;
    Ok((engine, game))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use arcade_engine::ecs::FrameScheduler;
    use arcade_engine::input::InputState;
    use arcade_engine::physics::CollisionDetector;
    use arcade_engine::spatial::BruteForce;

    /// World with the built-ins and every game component on default config
    pub fn world_with_game() -> (World, Rc<GameContext>) {
        let context = Rc::new(GameContext::new(GameConfig::default()));
        let mut world = World::with_builtins(7).unwrap();
        components::register(&mut world, &context).unwrap();
        (world, context)
    }

    /// Run one full tick without input
    pub fn step(world: &mut World, delta_time: f32) -> TickReport {
        FrameScheduler::new(CollisionDetector::new(Box::new(BruteForce)))
            .tick(world, delta_time, &InputState::new())
            .unwrap()
    }
}
