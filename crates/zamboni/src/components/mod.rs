//! Game-specific components
//!
//! Registered next to the engine's built-ins. Components that need tuning
//! values or sprites capture the shared [`GameContext`].

pub mod bounds;
pub mod effects;
pub mod ice;
pub mod player;
pub mod score;

use crate::GameContext;
use arcade_engine::ecs::World;
use arcade_engine::EngineResult;
use std::rc::Rc;

pub use bounds::VIEWPORT_BOUNDED;
pub use effects::{EXPLOSION, FADE_OUT, ROTATE};
pub use ice::ICE;
pub use player::{BULLET, PLAYER};
pub use score::SCORE;

/// Attribute keys owned by game components
pub mod keys {
    use arcade_engine::ecs::AttrKey;

    /// Alpha lost per second (FadeOut)
    pub const FADE_SPEED: AttrKey = AttrKey::Custom("fade_speed");
    /// Degrees per second (Rotate)
    pub const ROTATION_SPEED: AttrKey = AttrKey::Custom("rotation_speed");
    /// Rectangle the entity must stay inside (ViewportBounded)
    pub const BOUNDS: AttrKey = AttrKey::Custom("bounds");
    /// Handle to the player's scoreboard (Player)
    pub const SCOREBOARD: AttrKey = AttrKey::Custom("scoreboard");
    /// Current score (Score)
    pub const SCORE: AttrKey = AttrKey::Custom("score");
}

/// Register every game component
pub fn register(world: &mut World, context: &Rc<GameContext>) -> EngineResult<()> {
    world.register_component(FADE_OUT, effects::fade_out(context))?;
    world.register_component(ROTATE, effects::rotate())?;
    world.register_component(EXPLOSION, effects::explosion(context))?;
    world.register_component(VIEWPORT_BOUNDED, bounds::viewport_bounded(context))?;
    world.register_component(SCORE, score::definition())?;
    world.register_component(ICE, ice::definition(context))?;
    world.register_component(BULLET, player::bullet(context))?;
    world.register_component(PLAYER, player::definition())?;
    Ok(())
}
