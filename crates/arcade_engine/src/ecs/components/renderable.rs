//! Renderable components
//!
//! The engine never paints anything itself; these components only mark an
//! entity as something the host should draw and carry what to draw. See
//! [`World::render_snapshot`](crate::ecs::World::render_snapshot).

use crate::ecs::attributes::{AttrKey, Capabilities};
use crate::ecs::component::ComponentDef;
use crate::ecs::components::spatial::SPATIAL;
use crate::ecs::{EntityId, World};
use crate::engine::EngineResult;

/// Sprite component name
pub const RENDERABLE: &str = "Renderable";

/// Text component name
pub const TEXT: &str = "Text";

pub(crate) fn sprite_definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(AttrKey::Sprite, "")
        .grants(Capabilities::RENDERABLE)
}

pub(crate) fn text_definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(AttrKey::Text, "")
        .grants(Capabilities::RENDERABLE)
}

/// Change the visible sprite
pub fn set_sprite(world: &mut World, entity: EntityId, sprite: &str) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::Sprite, sprite)
}

/// Change the displayed text
pub fn set_text(world: &mut World, entity: EntityId, text: impl Into<String>) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::Text, text.into())
}
