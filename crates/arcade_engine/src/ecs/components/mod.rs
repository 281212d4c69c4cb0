//! Built-in components
//!
//! The reusable behaviors every game gets for free: position and size,
//! sprites and text, velocity and keyboard driven movement, collision
//! participation and timed self-destruction. Game crates register their own
//! components next to these through [`World::register_component`].
//!
//! [`World::register_component`]: crate::ecs::World::register_component

pub mod collision;
pub mod lifetime;
pub mod movement;
pub mod renderable;
pub mod spatial;

pub use collision::{set_collision, COLLISION};
pub use lifetime::{set_lifetime, Lifetime, LIFETIME};
pub use movement::{configure_multiway, move_to, set_velocity, MOTION, MULTIWAY};
pub use renderable::{set_sprite, set_text, RENDERABLE, TEXT};
pub use spatial::{place, SPATIAL};

use crate::ecs::component::ComponentTable;
use crate::engine::EngineResult;

/// Names of every built-in component
pub const BUILTINS: [&str; 7] = [SPATIAL, RENDERABLE, TEXT, MOTION, MULTIWAY, COLLISION, LIFETIME];

/// Register the built-in components into a table
pub fn register_builtins(table: &mut ComponentTable) -> EngineResult<()> {
    table.register(SPATIAL, spatial::definition())?;
    table.register(RENDERABLE, renderable::sprite_definition())?;
    table.register(TEXT, renderable::text_definition())?;
    table.register(MOTION, movement::motion_definition())?;
    table.register(MULTIWAY, movement::multiway_definition())?;
    table.register(COLLISION, collision::definition())?;
    table.register(LIFETIME, lifetime::definition())?;
    Ok(())
}
