//! ECS World: the entity registry
//!
//! Owns entity identities, their attribute bags and attached component sets,
//! the component table, the event bus and the delayed-callback list. All
//! mutation happens on the tick thread, so no locking is involved.
//!
//! Destruction is deferred: [`World::destroy`] only marks the entity, and the
//! scheduler removes it in its sweep at the end of the tick, after every
//! handler has had a chance to react.

use crate::ecs::attributes::{AttrKey, AttrValue, Capabilities};
use crate::ecs::component::{ComponentDef, ComponentTable, TickFn};
use crate::ecs::EntityId;
use crate::engine::{EngineError, EngineResult};
use crate::events::{args, Event, EventArg, EventBus, EventKind, Target};
use crate::foundation::math::{Rect, Vec2};
use crate::input::{Controls, InputState};
use crate::physics::CollisionTags;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::rc::Rc;

/// Delayed callback, invoked with the entity it was scheduled against
pub type DelayFn = Rc<dyn Fn(&mut World, EntityId) -> EngineResult<()>>;

/// Handle to a scheduled delayed callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelayId(u64);

struct DelayedCall {
    id: DelayId,
    owner: EntityId,
    due: f64,
    callback: DelayFn,
}

#[derive(Default)]
struct EntityRecord {
    attrs: HashMap<AttrKey, AttrValue>,
    components: Vec<String>,
    owners: HashMap<AttrKey, String>,
    capabilities: Capabilities,
    pending_destroy: bool,
}

impl EntityRecord {
    fn f32_or_zero(&self, key: AttrKey) -> f32 {
        self.attrs.get(&key).and_then(AttrValue::as_f32).unwrap_or(0.0)
    }

    fn tags(&self, key: AttrKey) -> CollisionTags {
        self.attrs.get(&key).and_then(AttrValue::as_tags).unwrap_or_default()
    }

    fn text(&self, key: AttrKey) -> Option<String> {
        self.attrs
            .get(&key)
            .and_then(AttrValue::as_text)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.f32_or_zero(AttrKey::X),
            self.f32_or_zero(AttrKey::Y),
            self.f32_or_zero(AttrKey::W),
            self.f32_or_zero(AttrKey::H),
        )
    }
}

/// Bounding box and filter data of a collidable entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collidable {
    /// The entity
    pub entity: EntityId,
    /// Axis-aligned bounding box
    pub bounds: Rect,
    /// What the entity is
    pub tag: CollisionTags,
    /// What the entity wants hit events for
    pub interests: CollisionTags,
}

/// Read-only view of a renderable entity for the host
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    /// The entity
    pub entity: EntityId,
    /// Position and size
    pub bounds: Rect,
    /// Rotation in degrees
    pub rotation: f32,
    /// Opacity
    pub alpha: f32,
    /// Sprite identifier, if any
    pub sprite: Option<String>,
    /// Text, if any
    pub text: Option<String>,
}

/// ECS World containing all entities and components
pub struct World {
    entities: SlotMap<EntityId, EntityRecord>,
    order: Vec<EntityId>,
    components: ComponentTable,
    events: EventBus,
    attaching: Vec<(EntityId, String)>,
    delays: Vec<DelayedCall>,
    firing: Vec<DelayId>,
    next_delay: u64,
    destroy_queue: Vec<EntityId>,
    input: InputState,
    elapsed: f64,
    rng: StdRng,
    scene_request: Option<String>,
}

impl World {
    /// Create a world with an empty component table
    pub fn new() -> Self {
        Self::with_components(ComponentTable::new(), 0)
    }

    /// Create a world with the built-in components and a fixed RNG seed
    pub fn with_builtins(seed: u64) -> EngineResult<Self> {
        Ok(Self::with_components(ComponentTable::with_builtins()?, seed))
    }

    /// Create a world around an existing component table
    pub fn with_components(components: ComponentTable, seed: u64) -> Self {
        Self {
            entities: SlotMap::with_key(),
            order: Vec::new(),
            components,
            events: EventBus::new(),
            attaching: Vec::new(),
            delays: Vec::new(),
            firing: Vec::new(),
            next_delay: 0,
            destroy_queue: Vec::new(),
            input: InputState::new(),
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(seed),
            scene_request: None,
        }
    }

    // ------------------------------------------------------------------
    // Components and events
    // ------------------------------------------------------------------

    /// Register a component definition
    pub fn register_component(&mut self, name: impl Into<String>, def: ComponentDef) -> EngineResult<()> {
        self.components.register(name, def)
    }

    /// The component table
    pub fn components(&self) -> &ComponentTable {
        &self.components
    }

    /// The event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Mutable access to the event bus
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Publish an event synchronously (see [`EventBus::publish`])
    pub fn publish(&mut self, target: Target, event: Event) -> EngineResult<()> {
        EventBus::publish(self, target, &event)
    }

    // ------------------------------------------------------------------
    // Entity lifecycle
    // ------------------------------------------------------------------

    /// Create a new entity with no components
    pub fn create(&mut self) -> EntityId {
        let entity = self.entities.insert(EntityRecord::default());
        self.order.push(entity);
        log::trace!("Created entity {entity:?}");
        entity
    }

    /// Create an entity, attach the named components in order and publish `Spawned`
    pub fn spawn(&mut self, names: &[&str]) -> EngineResult<EntityId> {
        let entity = self.create();
        for name in names {
            self.attach(entity, name)?;
        }
        let event = Event::new(EventKind::Spawned, self.elapsed).with_arg(args::ENTITY, EventArg::Entity(entity));
        self.publish(Target::Entity(entity), event)?;
        Ok(entity)
    }

    /// Attach a registered component to an entity.
    ///
    /// Required components are attached first. Attaching a component that is
    /// already present does nothing. The component's initializer runs last,
    /// synchronously, and may attach more components or create entities.
    pub fn attach(&mut self, entity: EntityId, name: &str) -> EngineResult<()> {
        if self.record(entity)?.components.iter().any(|attached| attached == name) {
            return Ok(());
        }
        // Cyclic requirement: the outer attach will finish the job
        if self.attaching.iter().any(|(e, n)| *e == entity && n == name) {
            return Ok(());
        }
        let def = self.components.get(name)?;

        self.attaching.push((entity, name.to_string()));
        let required = def.requires.iter().try_for_each(|required| self.attach(entity, required));
        self.attaching.pop();
        required?;

        let record = self.record_mut(entity)?;
        for (key, _) in &def.owns {
            if let Some(owner) = record.owners.get(key) {
                return Err(EngineError::AttributeConflict {
                    entity,
                    key: *key,
                    owner: owner.clone(),
                    claimant: name.to_string(),
                });
            }
        }
        for (key, initial) in &def.owns {
            record.owners.insert(*key, name.to_string());
            record.attrs.insert(*key, initial.clone());
        }
        record.components.push(name.to_string());
        record.capabilities |= def.grants;

        for (kind, handler) in &def.handlers {
            let handler = Rc::clone(handler);
            self.events.subscribe(Target::Entity(entity), *kind, move |world, event| {
                handler(world, entity, event)
            });
        }
        log::trace!("Attached {name} to {entity:?}");

        if let Some(init) = def.init.clone() {
            init(self, entity)?;
        }
        Ok(())
    }

    /// Request destruction of an entity.
    ///
    /// The entity stays readable until the end of the tick; its delayed
    /// callbacks are cancelled immediately. Requesting again while pending
    /// does nothing.
    pub fn destroy(&mut self, entity: EntityId) -> EngineResult<()> {
        let record = self.record_mut(entity)?;
        if record.pending_destroy {
            return Ok(());
        }
        record.pending_destroy = true;
        self.destroy_queue.push(entity);
        let cancelled = self.cancel_delays(entity);
        log::trace!("Destroy requested for {entity:?} ({cancelled} delays cancelled)");
        Ok(())
    }

    /// Remove every entity whose destruction was requested.
    ///
    /// Publishes `Destroyed` to the entity and globally before removal.
    /// Destroy requests made by those handlers are processed in the same call.
    /// An entity whose handler fails is still removed; the error is returned
    /// and the rest of the queue waits for the next flush.
    pub fn flush_destroyed(&mut self) -> EngineResult<usize> {
        let mut removed = 0;
        while !self.destroy_queue.is_empty() {
            let mut batch = std::mem::take(&mut self.destroy_queue).into_iter();
            while let Some(entity) = batch.next() {
                if !self.contains(entity) {
                    continue;
                }
                let event = Event::new(EventKind::Destroyed, self.elapsed)
                    .with_arg(args::ENTITY, EventArg::Entity(entity));
                let delivered = self
                    .publish(Target::Entity(entity), event.clone())
                    .and_then(|()| self.publish(Target::Global, event));
                self.remove_now(entity);
                removed += 1;
                if let Err(err) = delivered {
                    let mut rest: Vec<EntityId> = batch.collect();
                    rest.append(&mut self.destroy_queue);
                    self.destroy_queue = rest;
                    return Err(err);
                }
            }
        }
        Ok(removed)
    }

    fn remove_now(&mut self, entity: EntityId) {
        self.entities.remove(entity);
        self.order.retain(|e| *e != entity);
        self.events.remove_entity(entity);
        self.cancel_delays(entity);
        log::trace!("Removed entity {entity:?}");
    }

    /// Discard every entity, subscription and delayed callback (scene teardown)
    pub fn clear(&mut self) {
        let count = self.entities.len();
        self.entities.clear();
        self.order.clear();
        self.events.clear();
        self.attaching.clear();
        self.delays.clear();
        self.firing.clear();
        self.destroy_queue.clear();
        log::debug!("Cleared world ({count} entities discarded)");
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether the id refers to a live entity (including ones pending destruction)
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Whether the entity's destruction has been requested
    pub fn is_pending_destroy(&self, entity: EntityId) -> bool {
        self.entities.get(entity).is_some_and(|record| record.pending_destroy)
    }

    /// Live and not pending destruction
    pub fn is_active(&self, entity: EntityId) -> bool {
        self.entities.get(entity).is_some_and(|record| !record.pending_destroy)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Whether the entity has a component attached
    pub fn has_component(&self, entity: EntityId, name: &str) -> EngineResult<bool> {
        Ok(self.record(entity)?.components.iter().any(|attached| attached == name))
    }

    /// Attached component names in attach order
    pub fn components_of(&self, entity: EntityId) -> EngineResult<&[String]> {
        Ok(&self.record(entity)?.components)
    }

    /// Capabilities granted by the attached components
    pub fn capabilities(&self, entity: EntityId) -> EngineResult<Capabilities> {
        Ok(self.record(entity)?.capabilities)
    }

    /// Live entities that carry a component
    pub fn with_component<'a>(&'a self, name: &'a str) -> impl Iterator<Item = EntityId> + 'a {
        self.order.iter().copied().filter(move |entity| {
            self.entities
                .get(*entity)
                .is_some_and(|record| record.components.iter().any(|attached| attached == name))
        })
    }

    fn record(&self, entity: EntityId) -> EngineResult<&EntityRecord> {
        self.entities.get(entity).ok_or(EngineError::InvalidEntity(entity))
    }

    fn record_mut(&mut self, entity: EntityId) -> EngineResult<&mut EntityRecord> {
        self.entities.get_mut(entity).ok_or(EngineError::InvalidEntity(entity))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Get an attribute, `None` if the entity does not have it
    pub fn get_attr(&self, entity: EntityId, key: AttrKey) -> EngineResult<Option<&AttrValue>> {
        Ok(self.record(entity)?.attrs.get(&key))
    }

    /// Get an attribute that must be present
    pub fn attr(&self, entity: EntityId, key: AttrKey) -> EngineResult<&AttrValue> {
        self.get_attr(entity, key)?
            .ok_or(EngineError::MissingAttribute { entity, key })
    }

    /// Set an attribute owned by one of the entity's components
    pub fn set_attr(&mut self, entity: EntityId, key: AttrKey, value: impl Into<AttrValue>) -> EngineResult<()> {
        let record = self.record_mut(entity)?;
        if !record.owners.contains_key(&key) {
            return Err(EngineError::UnownedAttribute { entity, key });
        }
        record.attrs.insert(key, value.into());
        Ok(())
    }

    /// Name of the component owning an attribute key
    pub fn owner_of(&self, entity: EntityId, key: AttrKey) -> EngineResult<Option<&str>> {
        Ok(self.record(entity)?.owners.get(&key).map(String::as_str))
    }

    fn typed<'a, T>(
        &'a self,
        entity: EntityId,
        key: AttrKey,
        expected: &'static str,
        convert: impl FnOnce(&'a AttrValue) -> Option<T>,
    ) -> EngineResult<T> {
        convert(self.attr(entity, key)?).ok_or(EngineError::AttributeType { entity, key, expected })
    }

    /// Get a float attribute
    pub fn get_f32(&self, entity: EntityId, key: AttrKey) -> EngineResult<f32> {
        self.typed(entity, key, "float", AttrValue::as_f32)
    }

    /// Get a time attribute
    pub fn get_time(&self, entity: EntityId, key: AttrKey) -> EngineResult<f64> {
        self.typed(entity, key, "time", AttrValue::as_time)
    }

    /// Get an integer attribute
    pub fn get_int(&self, entity: EntityId, key: AttrKey) -> EngineResult<i64> {
        self.typed(entity, key, "int", AttrValue::as_int)
    }

    /// Get a boolean attribute
    pub fn get_bool(&self, entity: EntityId, key: AttrKey) -> EngineResult<bool> {
        self.typed(entity, key, "bool", AttrValue::as_bool)
    }

    /// Get a text attribute
    pub fn get_text(&self, entity: EntityId, key: AttrKey) -> EngineResult<&str> {
        self.typed(entity, key, "text", AttrValue::as_text)
    }

    /// Get an entity handle attribute
    pub fn get_entity(&self, entity: EntityId, key: AttrKey) -> EngineResult<EntityId> {
        self.typed(entity, key, "entity", AttrValue::as_entity)
    }

    /// Get a rectangle attribute
    pub fn get_rect(&self, entity: EntityId, key: AttrKey) -> EngineResult<Rect> {
        self.typed(entity, key, "rect", AttrValue::as_rect)
    }

    /// Get a collision tag attribute
    pub fn get_tags(&self, entity: EntityId, key: AttrKey) -> EngineResult<CollisionTags> {
        self.typed(entity, key, "tags", AttrValue::as_tags)
    }

    /// Get input bindings
    pub fn get_controls(&self, entity: EntityId, key: AttrKey) -> EngineResult<&Controls> {
        self.typed(entity, key, "controls", AttrValue::as_controls)
    }

    /// Top-left position
    pub fn position(&self, entity: EntityId) -> EngineResult<Vec2> {
        Ok(Vec2::new(self.get_f32(entity, AttrKey::X)?, self.get_f32(entity, AttrKey::Y)?))
    }

    /// Set the top-left position
    pub fn set_position(&mut self, entity: EntityId, position: Vec2) -> EngineResult<()> {
        self.set_attr(entity, AttrKey::X, position.x)?;
        self.set_attr(entity, AttrKey::Y, position.y)
    }

    /// Position and size as a rectangle
    pub fn bounds(&self, entity: EntityId) -> EngineResult<Rect> {
        Ok(Rect::new(
            self.get_f32(entity, AttrKey::X)?,
            self.get_f32(entity, AttrKey::Y)?,
            self.get_f32(entity, AttrKey::W)?,
            self.get_f32(entity, AttrKey::H)?,
        ))
    }

    /// Bounding boxes of every active collidable entity, in creation order
    pub fn collidables(&self) -> Vec<Collidable> {
        self.order
            .iter()
            .filter_map(|&entity| {
                let record = self.entities.get(entity)?;
                if record.pending_destroy || !record.capabilities.contains(Capabilities::COLLIDABLE) {
                    return None;
                }
                Some(Collidable {
                    entity,
                    bounds: record.bounds(),
                    tag: record.tags(AttrKey::CollisionTag),
                    interests: record.tags(AttrKey::HitInterests),
                })
            })
            .collect()
    }

    /// What the host needs to paint this frame, in creation order
    pub fn render_snapshot(&self) -> Vec<RenderItem> {
        self.order
            .iter()
            .filter_map(|&entity| {
                let record = self.entities.get(entity)?;
                if !record.capabilities.contains(Capabilities::RENDERABLE) {
                    return None;
                }
                Some(RenderItem {
                    entity,
                    bounds: record.bounds(),
                    rotation: record.f32_or_zero(AttrKey::Rotation),
                    alpha: record.f32_or_zero(AttrKey::Alpha),
                    sprite: record.text(AttrKey::Sprite),
                    text: record.text(AttrKey::Text),
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Time and delayed callbacks
    // ------------------------------------------------------------------

    /// Simulation time in seconds, the sum of all tick deltas
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub(crate) fn advance_clock(&mut self, delta_time: f32) {
        self.elapsed += f64::from(delta_time);
    }

    /// Schedule `callback` to run once `seconds` of simulation time have
    /// passed. Destroying `owner` cancels it.
    pub fn delay(
        &mut self,
        owner: EntityId,
        seconds: f32,
        callback: impl Fn(&mut World, EntityId) -> EngineResult<()> + 'static,
    ) -> EngineResult<DelayId> {
        self.record(owner)?;
        let id = DelayId(self.next_delay);
        self.next_delay += 1;
        self.delays.push(DelayedCall {
            id,
            owner,
            due: self.elapsed + f64::from(seconds.max(0.0)),
            callback: Rc::new(callback),
        });
        Ok(id)
    }

    /// Cancel one delayed callback. Returns whether it was still pending.
    pub fn cancel_delay(&mut self, id: DelayId) -> bool {
        let before = self.delays.len() + self.firing.len();
        self.delays.retain(|call| call.id != id);
        self.firing.retain(|firing| *firing != id);
        before != self.delays.len() + self.firing.len()
    }

    /// Cancel every delayed callback scheduled against `owner`
    pub fn cancel_delays(&mut self, owner: EntityId) -> usize {
        let before = self.delays.len();
        self.delays.retain(|call| call.owner != owner);
        before - self.delays.len()
    }

    /// Number of delayed callbacks still waiting for `owner`
    pub fn pending_delays(&self, owner: EntityId) -> usize {
        self.delays.iter().filter(|call| call.owner == owner).count()
    }

    /// Fire every callback due at the current time, earliest first.
    ///
    /// Callbacks scheduled while firing wait for the next tick.
    pub(crate) fn run_due_delays(&mut self) -> EngineResult<usize> {
        let now = self.elapsed;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.delays).into_iter().partition(|call| call.due <= now);
        self.delays = waiting;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        self.firing = due.iter().map(|call| call.id).collect();

        let mut fired = 0;
        let mut due = due.into_iter();
        while let Some(call) = due.next() {
            if !self.firing.contains(&call.id) || !self.is_active(call.owner) {
                continue;
            }
            if let Err(err) = (call.callback)(self, call.owner) {
                // Whatever has not fired yet stays scheduled for the next tick
                let firing = std::mem::take(&mut self.firing);
                let unfired: Vec<DelayedCall> = due
                    .filter(|call| firing.contains(&call.id) && self.is_active(call.owner))
                    .collect();
                self.delays.extend(unfired);
                return Err(err);
            }
            fired += 1;
        }
        self.firing.clear();
        Ok(fired)
    }

    /// Run every active entity's per-tick hooks in creation order, and
    /// within an entity in attach order.
    pub(crate) fn run_tick_hooks(&mut self, delta_time: f32) -> EngineResult<()> {
        let order = self.order.clone();
        for entity in order {
            let Some(record) = self.entities.get(entity) else {
                continue;
            };
            if record.pending_destroy {
                continue;
            }
            let mut hooks: Vec<TickFn> = Vec::new();
            for name in &record.components {
                if let Some(tick) = self.components.get(name)?.tick.clone() {
                    hooks.push(tick);
                }
            }
            for hook in hooks {
                if !self.is_active(entity) {
                    break;
                }
                hook(self, entity, delta_time)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Input, randomness, scene requests
    // ------------------------------------------------------------------

    /// Input sampled for the current tick
    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub(crate) fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    /// Deterministic random number generator
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Reseed the random number generator
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Ask for a scene transition once the current tick has finished
    pub fn request_scene(&mut self, name: impl Into<String>) {
        let name = name.into();
        log::debug!("Scene transition to '{name}' requested");
        self.scene_request = Some(name);
    }

    /// Pending scene transition, if any
    pub fn pending_scene(&self) -> Option<&str> {
        self.scene_request.as_deref()
    }

    pub(crate) fn take_scene_request(&mut self) -> Option<String> {
        self.scene_request.take()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
