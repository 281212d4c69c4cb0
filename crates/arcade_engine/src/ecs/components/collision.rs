//! Collision component
//!
//! Marks an entity as collidable and carries its tag and hit interests.
//! Detection itself lives in [`crate::physics::CollisionDetector`].

use crate::ecs::attributes::{AttrKey, Capabilities};
use crate::ecs::component::ComponentDef;
use crate::ecs::components::spatial::SPATIAL;
use crate::ecs::{EntityId, World};
use crate::engine::EngineResult;
use crate::physics::CollisionTags;

/// Component name
pub const COLLISION: &str = "Collision";

pub(crate) fn definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(AttrKey::CollisionTag, CollisionTags::empty())
        .owns(AttrKey::HitInterests, CollisionTags::empty())
        .grants(Capabilities::COLLIDABLE)
}

/// Set what the entity is and which tags it wants hit events for
pub fn set_collision(
    world: &mut World,
    entity: EntityId,
    tag: CollisionTags,
    interests: CollisionTags,
) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::CollisionTag, tag)?;
    world.set_attr(entity, AttrKey::HitInterests, interests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;

    #[test]
    fn test_collidable_listing() {
        let mut world = World::with_builtins(0).unwrap();
        let plain = world.spawn(&[SPATIAL]).unwrap();
        let solid = world.spawn(&[COLLISION]).unwrap();
        set_collision(&mut world, solid, CollisionTags::TARGET, CollisionTags::PLAYER).unwrap();
        crate::ecs::components::place(&mut world, solid, Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();

        let collidables = world.collidables();
        assert_eq!(collidables.len(), 1);
        assert_eq!(collidables[0].entity, solid);
        assert_eq!(collidables[0].bounds, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(collidables[0].interests, CollisionTags::PLAYER);
        assert!(world.capabilities(solid).unwrap().contains(Capabilities::COLLIDABLE));
        assert!(!world.capabilities(plain).unwrap().contains(Capabilities::COLLIDABLE));
    }
}
