//! Keeps an entity inside a rectangle
//!
//! Listens to the entity's own `Moved` events and puts it back where it was
//! whenever a step leaves it not fully inside its bounds.

use super::keys::BOUNDS;
use crate::GameContext;
use arcade_engine::ecs::components::SPATIAL;
use arcade_engine::ecs::ComponentDef;
use arcade_engine::events::{args, EventKind};
use arcade_engine::foundation::math::Vec2;
use std::rc::Rc;

/// Component name
pub const VIEWPORT_BOUNDED: &str = "ViewportBounded";

pub(crate) fn viewport_bounded(context: &Rc<GameContext>) -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(BOUNDS, context.config.arena.player_bounds)
        .on_event(EventKind::Moved, |world, entity, event| {
            let Some((x, y)) = event.get_position(args::OLD_POSITION) else {
                return Ok(());
            };
            let bounds = world.get_rect(entity, BOUNDS)?;
            if !bounds.contains_rect(&world.bounds(entity)?) {
                log::trace!("{entity:?} left its bounds, reverting to ({x}, {y})");
                world.set_position(entity, Vec2::new(x, y))?;
            }
            Ok(())
        })
}
