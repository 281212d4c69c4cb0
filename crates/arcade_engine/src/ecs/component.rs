//! Component definitions and the component table
//!
//! A component is a named, stateless template: the attributes it owns (with
//! their initial values), the components it requires, the capabilities it
//! grants, and its behavior hooks. All instance state lives on the entity.
//!
//! ```ignore
//! table.register(
//!     "Rotate",
//!     ComponentDef::new()
//!         .requires(&["Spatial"])
//!         .owns(ROTATION_SPEED, 0.0_f32)
//!         .on_tick(|world, entity, dt| {
//!             let speed = world.get_f32(entity, ROTATION_SPEED)?;
//!             let rotation = world.get_f32(entity, AttrKey::Rotation)?;
//!             world.set_attr(entity, AttrKey::Rotation, rotation + speed * dt)
//!         }),
//! )?;
//! ```

use crate::ecs::attributes::{AttrKey, AttrValue, Capabilities};
use crate::ecs::{EntityId, World};
use crate::engine::{EngineError, EngineResult};
use crate::events::{Event, EventKind};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Runs once when the component is attached
pub type InitFn = Rc<dyn Fn(&mut World, EntityId) -> EngineResult<()>>;

/// Runs once per tick with the frame delta in seconds
pub type TickFn = Rc<dyn Fn(&mut World, EntityId, f32) -> EngineResult<()>>;

/// Runs when an event is published to the entity
pub type EventFn = Rc<dyn Fn(&mut World, EntityId, &Event) -> EngineResult<()>>;

/// Component definition built with a small builder
#[derive(Clone, Default)]
pub struct ComponentDef {
    pub(crate) requires: Vec<&'static str>,
    pub(crate) owns: Vec<(AttrKey, AttrValue)>,
    pub(crate) grants: Capabilities,
    pub(crate) init: Option<InitFn>,
    pub(crate) tick: Option<TickFn>,
    pub(crate) handlers: Vec<(EventKind, EventFn)>,
}

impl ComponentDef {
    /// Create an empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Components attached before this one
    pub fn requires(mut self, names: &[&'static str]) -> Self {
        self.requires.extend_from_slice(names);
        self
    }

    /// Declare ownership of an attribute key with its initial value
    pub fn owns(mut self, key: AttrKey, initial: impl Into<AttrValue>) -> Self {
        self.owns.push((key, initial.into()));
        self
    }

    /// Capabilities granted to entities carrying this component
    pub fn grants(mut self, capabilities: Capabilities) -> Self {
        self.grants |= capabilities;
        self
    }

    /// Initializer
    pub fn on_init(mut self, init: impl Fn(&mut World, EntityId) -> EngineResult<()> + 'static) -> Self {
        self.init = Some(Rc::new(init));
        self
    }

    /// Per-tick hook
    pub fn on_tick(mut self, tick: impl Fn(&mut World, EntityId, f32) -> EngineResult<()> + 'static) -> Self {
        self.tick = Some(Rc::new(tick));
        self
    }

    /// Event handler, subscribed on the entity when the component is attached
    pub fn on_event(
        mut self,
        kind: EventKind,
        handler: impl Fn(&mut World, EntityId, &Event) -> EngineResult<()> + 'static,
    ) -> Self {
        self.handlers.push((kind, Rc::new(handler)));
        self
    }

    /// Required component names
    pub fn required(&self) -> &[&'static str] {
        &self.requires
    }

    /// Owned attribute keys
    pub fn owned_keys(&self) -> impl Iterator<Item = AttrKey> + '_ {
        self.owns.iter().map(|(key, _)| *key)
    }

    /// Whether the component has a per-tick hook
    pub fn has_tick(&self) -> bool {
        self.tick.is_some()
    }
}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDef")
            .field("requires", &self.requires)
            .field("owns", &self.owns.iter().map(|(key, _)| key).collect::<Vec<_>>())
            .field("grants", &self.grants)
            .field("init", &self.init.is_some())
            .field("tick", &self.tick.is_some())
            .field("handlers", &self.handlers.iter().map(|(kind, _)| kind).collect::<Vec<_>>())
            .finish()
    }
}

/// Maps component names to their definitions
#[derive(Debug, Default)]
pub struct ComponentTable {
    defs: HashMap<String, Rc<ComponentDef>>,
}

impl ComponentTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the engine's built-in components registered
    pub fn with_builtins() -> EngineResult<Self> {
        let mut table = Self::new();
        crate::ecs::components::register_builtins(&mut table)?;
        Ok(table)
    }

    /// Register a component definition
    pub fn register(&mut self, name: impl Into<String>, def: ComponentDef) -> EngineResult<()> {
        let name = name.into();
        if self.defs.contains_key(&name) {
            return Err(EngineError::DuplicateComponent(name));
        }
        log::debug!("Registered component {name}: {def:?}");
        self.defs.insert(name, Rc::new(def));
        Ok(())
    }

    /// Look up a component definition
    pub fn get(&self, name: &str) -> EngineResult<Rc<ComponentDef>> {
        self.defs
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownComponent(name.to_string()))
    }

    /// Whether a component is registered
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
