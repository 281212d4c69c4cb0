//! # Scene Manager
//!
//! A scene is a named setup routine that populates an empty world. Entering
//! a scene discards every entity, subscription and pending delay of the old
//! one before the setup runs, then broadcasts `SceneChanged`.
//!
//! Handlers cannot swap scenes in the middle of a tick; they call
//! [`World::request_scene`] and the engine applies the request once the tick
//! has finished.

use crate::ecs::World;
use crate::engine::{EngineError, EngineResult};
use crate::events::{args, Event, EventArg, EventKind, Target};
use std::collections::HashMap;
use std::rc::Rc;

/// Scene setup routine
pub type SceneSetup = Rc<dyn Fn(&mut World) -> EngineResult<()>>;

/// Registry of named scenes
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, SceneSetup>,
    current: Option<String>,
}

impl SceneManager {
    /// Create an empty scene manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene under a unique name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        setup: impl Fn(&mut World) -> EngineResult<()> + 'static,
    ) -> EngineResult<()> {
        let name = name.into();
        if self.scenes.contains_key(&name) {
            return Err(EngineError::DuplicateScene(name));
        }
        log::debug!("Registered scene '{name}'");
        self.scenes.insert(name, Rc::new(setup));
        Ok(())
    }

    /// Whether a scene is registered
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Name of the active scene
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Tear down the world and run the named scene's setup
    pub fn enter(&mut self, world: &mut World, name: &str) -> EngineResult<()> {
        let setup = self
            .scenes
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownScene(name.to_string()))?;

        log::info!("Entering scene '{name}'");
        world.clear();
        self.current = Some(name.to_string());
        setup(world)?;

        let event = Event::new(EventKind::SceneChanged, world.elapsed())
            .with_arg(args::SCENE, EventArg::Scene(name.to_string()));
        world.publish(Target::Global, event)
    }

    /// Apply a transition requested through [`World::request_scene`].
    ///
    /// Returns whether a scene was entered.
    pub fn apply_pending(&mut self, world: &mut World) -> EngineResult<bool> {
        match world.take_scene_request() {
            Some(name) => {
                self.enter(world, &name)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
