//! Event bus following Game Engine Architecture Ch 16.8
//!
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Registration system (only notify interested handlers)
//! - Immediate, synchronous delivery: a hit, the score change it causes and
//!   the explosion it spawns all happen inside the same tick
//!
//! Handlers may publish further events. The subscriber list for a
//! `(target, kind)` pair is snapshotted when publishing starts, so handlers
//! subscribing or unsubscribing mid-dispatch never corrupt the iteration.

use crate::ecs::{EntityId, World};
use crate::engine::{EngineError, EngineResult};
use std::collections::HashMap;
use std::rc::Rc;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Entity finished its component setup
    Spawned,
    /// Once per tick, after entity hooks ran
    EnterFrame,
    /// Entity position changed; carries the old position
    Moved,
    /// Collision-derived hit; carries the other entity
    Hit,
    /// Fade-out finished
    Faded,
    /// Entity is about to be removed
    Destroyed,
    /// Discrete key press of a logical action
    KeyDown,
    /// A score counter changed
    ScoreChanged,
    /// The active scene changed
    SceneChanged,
    /// Game-defined event
    Custom(&'static str),
}

/// Well-known argument keys
pub mod args {
    /// The other entity of a hit
    pub const OTHER: &str = "other";
    /// The entity an event is about
    pub const ENTITY: &str = "entity";
    /// Position before a move
    pub const OLD_POSITION: &str = "old_position";
    /// Logical action of a key press
    pub const ACTION: &str = "action";
    /// New counter value
    pub const VALUE: &str = "value";
    /// Scene name
    pub const SCENE: &str = "scene";
    /// Frame delta in seconds
    pub const DELTA: &str = "delta";
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Entity handle
    Entity(EntityId),
    /// Position coordinates
    Position(f32, f32),
    /// Logical action name
    Action(String),
    /// Integer value
    Count(i64),
    /// Scene name
    Scene(String),
    /// Time in seconds
    Seconds(f32),
}

/// Event with kind, timestamp and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Kind of event
    pub kind: EventKind,
    /// Simulation time when the event was raised (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given kind and timestamp
    pub fn new(kind: EventKind, timestamp: f64) -> Self {
        Self {
            kind,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get an entity argument
    pub fn get_entity(&self, key: &str) -> Option<EntityId> {
        match self.get_arg(key) {
            Some(EventArg::Entity(entity)) => Some(*entity),
            _ => None,
        }
    }

    /// Get a position argument
    pub fn get_position(&self, key: &str) -> Option<(f32, f32)> {
        match self.get_arg(key) {
            Some(EventArg::Position(x, y)) => Some((*x, *y)),
            _ => None,
        }
    }

    /// Get the action argument
    pub fn get_action(&self) -> Option<&str> {
        match self.get_arg(args::ACTION) {
            Some(EventArg::Action(action)) => Some(action),
            _ => None,
        }
    }

    /// Get an integer argument
    pub fn get_count(&self, key: &str) -> Option<i64> {
        match self.get_arg(key) {
            Some(EventArg::Count(count)) => Some(*count),
            _ => None,
        }
    }
}

/// Where an event is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Broadcast to global subscribers
    Global,
    /// Delivered to subscribers on one entity
    Entity(EntityId),
}

/// Event handler
pub type Handler = Rc<dyn Fn(&mut World, &Event) -> EngineResult<()>>;

/// Subscription handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    owner: Option<EntityId>,
    handler: Handler,
}

/// In-process publish/subscribe
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: HashMap<(Target, EventKind), Vec<Subscription>>,
}

impl EventBus {
    /// Create a new empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events of `kind` on `target`.
    ///
    /// Subscriptions on an entity are dropped when the entity is destroyed.
    pub fn subscribe(
        &mut self,
        target: Target,
        kind: EventKind,
        handler: impl Fn(&mut World, &Event) -> EngineResult<()> + 'static,
    ) -> SubscriptionId {
        let owner = match target {
            Target::Entity(entity) => Some(entity),
            Target::Global => None,
        };
        self.insert(owner, target, kind, Rc::new(handler))
    }

    /// Register a handler whose lifetime is tied to `owner`, typically an
    /// entity listening to global broadcasts such as key presses.
    pub fn subscribe_owned(
        &mut self,
        owner: EntityId,
        target: Target,
        kind: EventKind,
        handler: impl Fn(&mut World, &Event) -> EngineResult<()> + 'static,
    ) -> SubscriptionId {
        self.insert(Some(owner), target, kind, Rc::new(handler))
    }

    fn insert(&mut self, owner: Option<EntityId>, target: Target, kind: EventKind, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry((target, kind))
            .or_default()
            .push(Subscription { id, owner, handler });
        id
    }

    /// Remove a single subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for subscriptions in self.handlers.values_mut() {
            let before = subscriptions.len();
            subscriptions.retain(|subscription| subscription.id != id);
            removed |= subscriptions.len() != before;
        }
        self.handlers.retain(|_, subscriptions| !subscriptions.is_empty());
        removed
    }

    /// Drop every subscription on or owned by `entity`
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.handlers.retain(|(target, _), subscriptions| {
            if *target == Target::Entity(entity) {
                return false;
            }
            subscriptions.retain(|subscription| subscription.owner != Some(entity));
            !subscriptions.is_empty()
        });
    }

    /// Drop all subscriptions
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of handlers registered for `(target, kind)`
    pub fn subscriber_count(&self, target: Target, kind: EventKind) -> usize {
        self.handlers.get(&(target, kind)).map_or(0, Vec::len)
    }

    fn snapshot(&self, target: Target, kind: EventKind) -> Vec<Handler> {
        self.handlers
            .get(&(target, kind))
            .map(|subscriptions| subscriptions.iter().map(|s| Rc::clone(&s.handler)).collect())
            .unwrap_or_default()
    }

    /// Deliver `event` to every handler subscribed on `target`, in
    /// subscription order, before returning. The first handler error stops
    /// delivery and is returned to the publisher.
    pub fn publish(world: &mut World, target: Target, event: &Event) -> EngineResult<()> {
        if let Target::Entity(entity) = target {
            if !world.contains(entity) {
                return Err(EngineError::InvalidEntity(entity));
            }
        }
        let handlers = world.events().snapshot(target, event.kind);
        log::trace!("Publishing {:?} to {:?} ({} handlers)", event.kind, target, handlers.len());
        for handler in handlers {
            handler(world, event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
    ) -> impl Fn(&mut World, &Event) -> EngineResult<()> + 'static {
        let log = Rc::clone(log);
        move |_, _| {
            log.borrow_mut().push(name);
            Ok(())
        }
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut world = World::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second", "third"] {
            world.events_mut().subscribe(Target::Global, EventKind::ScoreChanged, recorder(&log, name));
        }

        world.publish(Target::Global, Event::new(EventKind::ScoreChanged, 0.0)).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_only_matching_kind_and_target() {
        let mut world = World::new();
        let entity = world.create();
        let log = Rc::new(RefCell::new(Vec::new()));
        world.events_mut().subscribe(Target::Entity(entity), EventKind::Hit, recorder(&log, "hit"));
        world.events_mut().subscribe(Target::Global, EventKind::Hit, recorder(&log, "global"));

        world.publish(Target::Entity(entity), Event::new(EventKind::Hit, 0.0)).unwrap();
        world.publish(Target::Entity(entity), Event::new(EventKind::Moved, 0.0)).unwrap();
        assert_eq!(*log.borrow(), vec!["hit"]);
    }

    #[test]
    fn test_reentrant_publish_and_subscribe() {
        let mut world = World::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_log = Rc::clone(&log);
        world.events_mut().subscribe(
            Target::Global,
            EventKind::Custom("outer"),
            move |world, event| {
                inner_log.borrow_mut().push("outer");
                // Subscribing during dispatch must not affect the current delivery
                world.events_mut().subscribe(Target::Global, EventKind::Custom("outer"), recorder(&inner_log, "late"));
                world.publish(Target::Global, Event::new(EventKind::Custom("inner"), event.timestamp))
            },
        );
        world.events_mut().subscribe(Target::Global, EventKind::Custom("inner"), recorder(&log, "inner"));

        world.publish(Target::Global, Event::new(EventKind::Custom("outer"), 0.0)).unwrap();
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
        assert_eq!(world.events().subscriber_count(Target::Global, EventKind::Custom("outer")), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut world = World::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = world.events_mut().subscribe(Target::Global, EventKind::Faded, recorder(&log, "faded"));
        assert!(world.events_mut().unsubscribe(id));
        assert!(!world.events_mut().unsubscribe(id));

        world.publish(Target::Global, Event::new(EventKind::Faded, 0.0)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_remove_entity_drops_owned_global_subscriptions() {
        let mut world = World::new();
        let entity = world.create();
        let log = Rc::new(RefCell::new(Vec::new()));
        world.events_mut().subscribe_owned(entity, Target::Global, EventKind::KeyDown, recorder(&log, "owned"));
        world.events_mut().subscribe(Target::Global, EventKind::KeyDown, recorder(&log, "free"));

        world.events_mut().remove_entity(entity);
        world.publish(Target::Global, Event::new(EventKind::KeyDown, 0.0)).unwrap();
        assert_eq!(*log.borrow(), vec!["free"]);
    }

    #[test]
    fn test_handler_error_propagates() {
        let mut world = World::new();
        let ghost = world.create();
        world.events_mut().subscribe(
            Target::Global,
            EventKind::Custom("fail"),
            move |world, _| world.get_f32(ghost, crate::ecs::AttrKey::X).map(|_| ()),
        );
        world.destroy(ghost).unwrap();
        world.flush_destroyed().unwrap();

        let err = world.publish(Target::Global, Event::new(EventKind::Custom("fail"), 0.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidEntity(id) if id == ghost));
    }

    #[test]
    fn test_event_args() {
        let event = Event::new(EventKind::Moved, 1.5)
            .with_arg(args::OLD_POSITION, EventArg::Position(3.0, 4.0))
            .with_arg(args::ACTION, EventArg::Action("fire".to_string()));
        assert_eq!(event.get_position(args::OLD_POSITION), Some((3.0, 4.0)));
        assert_eq!(event.get_action(), Some("fire"));
        assert_eq!(event.get_entity(args::OTHER), None);
    }
}
