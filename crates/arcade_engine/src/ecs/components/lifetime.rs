//! Lifetime component
//!
//! Destroys the entity once its lifetime has run out. Used for projectiles
//! and short lived effects.

use crate::ecs::attributes::AttrKey;
use crate::ecs::component::ComponentDef;
use crate::ecs::{EntityId, World};
use crate::engine::EngineResult;

/// Component name
pub const LIFETIME: &str = "Lifetime";

/// Lifetime window of an entity
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    /// Simulation time when the lifetime started (seconds)
    pub created_at: f64,
    /// How long the entity should live (seconds)
    pub duration: f32,
}

impl Lifetime {
    /// Create a new lifetime window
    pub fn new(created_at: f64, duration: f32) -> Self {
        Self { created_at, duration }
    }

    /// Check if the lifetime has expired
    pub fn is_expired(&self, current_time: f64) -> bool {
        if self.duration <= 0.0 {
            false // Infinite lifetime
        } else {
            current_time >= self.created_at + f64::from(self.duration)
        }
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self, current_time: f64) -> f64 {
        if self.duration <= 0.0 {
            f64::INFINITY
        } else {
            (self.created_at + f64::from(self.duration) - current_time).max(0.0)
        }
    }
}

pub(crate) fn definition() -> ComponentDef {
    ComponentDef::new()
        .owns(AttrKey::SpawnedAt, 0.0_f64)
        .owns(AttrKey::Lifetime, 0.0_f32)
        .on_init(|world, entity| world.set_attr(entity, AttrKey::SpawnedAt, world.elapsed()))
        .on_tick(|world, entity, _| {
            let lifetime = Lifetime::new(
                world.get_time(entity, AttrKey::SpawnedAt)?,
                world.get_f32(entity, AttrKey::Lifetime)?,
            );
            if lifetime.is_expired(world.elapsed()) {
                log::trace!("Lifetime of {entity:?} expired");
                world.destroy(entity)?;
            }
            Ok(())
        })
}

/// Give an entity `seconds` to live, counted from now
pub fn set_lifetime(world: &mut World, entity: EntityId, seconds: f32) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::SpawnedAt, world.elapsed())?;
    world.set_attr(entity, AttrKey::Lifetime, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_not_expired() {
        let lifetime = Lifetime::new(0.0, 5.0);
        assert!(!lifetime.is_expired(2.0));
    }

    #[test]
    fn test_infinite_lifetime() {
        let lifetime = Lifetime::new(0.0, 0.0);
        assert!(!lifetime.is_expired(1000.0));
        assert_eq!(lifetime.remaining(1000.0), f64::INFINITY);
    }

    #[test]
    fn test_remaining_time() {
        let lifetime = Lifetime::new(1.0, 10.0);
        assert_eq!(lifetime.remaining(4.0), 7.0);
        assert_eq!(lifetime.remaining(12.0), 0.0);
    }

    #[test]
    fn test_component_destroys_on_expiry() {
        let mut world = World::with_builtins(0).unwrap();
        world.advance_clock(2.0);
        let entity = world.spawn(&[LIFETIME]).unwrap();
        set_lifetime(&mut world, entity, 1.0).unwrap();

        world.advance_clock(0.5);
        world.run_tick_hooks(0.5).unwrap();
        assert!(!world.is_pending_destroy(entity));

        world.advance_clock(0.5);
        world.run_tick_hooks(0.5).unwrap();
        assert!(world.is_pending_destroy(entity));
    }
}
