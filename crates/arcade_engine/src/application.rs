//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::ecs::TickReport;
use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to create your game using the engine.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is created. Register components and
    /// scenes here and enter the first scene.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Called after every tick with what happened during it
    fn update(&mut self, _engine: &mut Engine, _report: &TickReport) -> Result<(), AppError> {
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the main loop ends.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
