//! Spatial component: position, size, rotation and opacity

use crate::ecs::attributes::AttrKey;
use crate::ecs::component::ComponentDef;
use crate::ecs::{EntityId, World};
use crate::engine::EngineResult;
use crate::foundation::math::Rect;

/// Component name
pub const SPATIAL: &str = "Spatial";

pub(crate) fn definition() -> ComponentDef {
    ComponentDef::new()
        .owns(AttrKey::X, 0.0_f32)
        .owns(AttrKey::Y, 0.0_f32)
        .owns(AttrKey::W, 0.0_f32)
        .owns(AttrKey::H, 0.0_f32)
        .owns(AttrKey::Rotation, 0.0_f32)
        .owns(AttrKey::Alpha, 1.0_f32)
}

/// Set position and size in one go
pub fn place(world: &mut World, entity: EntityId, bounds: Rect) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::X, bounds.x)?;
    world.set_attr(entity, AttrKey::Y, bounds.y)?;
    world.set_attr(entity, AttrKey::W, bounds.w)?;
    world.set_attr(entity, AttrKey::H, bounds.h)
}
