//! Player zambonis and the bullets they fire

use super::bounds::VIEWPORT_BOUNDED;
use super::keys::SCOREBOARD;
use crate::GameContext;
use arcade_engine::ecs::components::{
    set_collision, set_lifetime, set_velocity, COLLISION, LIFETIME, MOTION, MULTIWAY, RENDERABLE,
};
use arcade_engine::ecs::{AttrKey, ComponentDef, EntityId, World};
use arcade_engine::events::{EventKind, Target};
use arcade_engine::foundation::math::Vec2;
use arcade_engine::physics::CollisionTags;
use arcade_engine::EngineResult;
use std::rc::Rc;

/// Component name
pub const PLAYER: &str = "Player";

/// Component name
pub const BULLET: &str = "Bullet";

pub(crate) fn definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[RENDERABLE, MULTIWAY, COLLISION, VIEWPORT_BOUNDED])
        .owns(SCOREBOARD, EntityId::default())
        .on_init(|world, entity| {
            set_collision(world, entity, CollisionTags::PLAYER, CollisionTags::empty())?;
            world
                .events_mut()
                .subscribe_owned(entity, Target::Global, EventKind::KeyDown, move |world, event| {
                    if !world.is_active(entity) {
                        return Ok(());
                    }
                    let controls = world.get_controls(entity, AttrKey::Controls)?;
                    let fired = controls.fire.is_some() && controls.fire.as_deref() == event.get_action();
                    if fired {
                        fire_bullet(world, entity)?;
                    }
                    Ok(())
                });
            Ok(())
        })
}

/// Spawn a bullet just right of the player's top-left corner
pub fn fire_bullet(world: &mut World, player: EntityId) -> EngineResult<EntityId> {
    let origin = world.position(player)?;
    let bullet = world.spawn(&[BULLET])?;
    world.set_position(bullet, origin + Vec2::new(5.0, 0.0))?;
    log::trace!("{player:?} fired {bullet:?}");
    Ok(bullet)
}

pub(crate) fn bullet(context: &Rc<GameContext>) -> ComponentDef {
    let context = Rc::clone(context);
    ComponentDef::new()
        .requires(&[RENDERABLE, MOTION, LIFETIME, COLLISION])
        .on_init(move |world, entity| {
            let gameplay = &context.config.gameplay;
            context.atlas.show(world, entity, &gameplay.bullet_sprite)?;
            set_collision(world, entity, CollisionTags::PROJECTILE, CollisionTags::empty())?;
            set_velocity(world, entity, Vec2::new(0.0, -gameplay.bullet_speed))?;
            set_lifetime(world, entity, gameplay.bullet_lifetime)
        })
}
