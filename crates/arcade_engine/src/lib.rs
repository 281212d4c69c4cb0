//! # Arcade Engine
//!
//! A small entity/component/event core for 2D arcade games.
//!
//! ## Features
//!
//! - **Entity Registry**: generational ids with typed, component-owned attributes
//! - **Components**: named, stateless definitions composed by requirement
//! - **Event Bus**: synchronous, re-entrant publish/subscribe
//! - **Collision**: AABB overlap with pluggable broad phase and tag interests
//! - **Scenes**: named setup routines, one active at a time
//!
//! Rendering, audio and devices belong to the host. It feeds the engine a
//! frame delta plus an [`InputState`](input::InputState) per tick and paints
//! [`World::render_snapshot`](ecs::World::render_snapshot) afterwards.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl Application for MyGame {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.register_scene("main", |world| {
//!             let label = world.spawn(&[TEXT])?;
//!             set_text(world, label, "hello")
//!         })?;
//!         engine.enter_scene("main")?;
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! struct Host;
//!
//! impl FrameSource for Host {
//!     fn next_frame(&mut self) -> Option<(f32, InputState)> {
//!         Some((1.0 / 60.0, InputState::new()))
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     Engine::run(EngineConfig::default(), &mut MyGame, &mut Host)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod assets;
pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod spatial;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineConfig, EngineError, EngineResult, FrameSource};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetLoader, LoadObserver, LoadProgress, LoadedAsset},
        config::{Config, ConfigError},
        ecs::{
            components::{
                configure_multiway, move_to, place, set_collision, set_lifetime, set_sprite, set_text,
                set_velocity, COLLISION, LIFETIME, MOTION, MULTIWAY, RENDERABLE, SPATIAL, TEXT,
            },
            AttrKey, AttrValue, ComponentDef, EntityId, RenderItem, TickReport, World,
        },
        events::{args, Event, EventArg, EventKind, Target},
        foundation::{
            math::{Rect, Vec2},
            time::{Stopwatch, Timer},
        },
        input::{Controls, InputState},
        physics::CollisionTags,
        AppError, Application, Engine, EngineConfig, EngineError, EngineResult, FrameSource,
    };
}
