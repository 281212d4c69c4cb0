//! Ice cracks, the targets players drive over
//!
//! A hit scores for the player, leaves an explosion behind and parks the crack
//! off screen until it respawns somewhere else in the spawn range.

use super::effects::{EXPLOSION, ROTATE};
use super::keys::{ROTATION_SPEED, SCOREBOARD};
use super::score;
use crate::GameContext;
use arcade_engine::ecs::components::{set_collision, COLLISION, RENDERABLE};
use arcade_engine::ecs::{AttrKey, ComponentDef, EntityId, World};
use arcade_engine::events::{args, EventKind};
use arcade_engine::foundation::math::{Rect, Vec2};
use arcade_engine::physics::CollisionTags;
use arcade_engine::EngineResult;
use rand::seq::SliceRandom;
use rand::Rng;
use std::rc::Rc;

/// Component name
pub const ICE: &str = "Ice";

pub(crate) fn definition(context: &Rc<GameContext>) -> ComponentDef {
    let init_context = Rc::clone(context);
    let hit_context = Rc::clone(context);
    ComponentDef::new()
        .requires(&[RENDERABLE, COLLISION, ROTATE])
        .on_init(move |world, entity| {
            let gameplay = &init_context.config.gameplay;
            if let Some(sprite) = gameplay.ice_sprites.choose(world.rng()).cloned() {
                init_context.atlas.show(world, entity, &sprite)?;
            }
            set_collision(world, entity, CollisionTags::TARGET, CollisionTags::PLAYER)?;
            world.set_attr(entity, ROTATION_SPEED, gameplay.ice_rotation_speed)?;
            respawn(world, entity, init_context.config.arena.ice_spawn)
        })
        .on_event(EventKind::Hit, move |world, entity, event| {
            let Some(player) = event.get_entity(args::OTHER) else {
                return Ok(());
            };
            on_hit(world, entity, player, &hit_context)
        })
}

fn on_hit(world: &mut World, ice: EntityId, player: EntityId, context: &GameContext) -> EngineResult<()> {
    if !context.config.screen().intersects(&world.bounds(ice)?) {
        log::trace!("Ignoring hit on parked ice {ice:?}");
        return Ok(());
    }

    let scoreboard = world.get_entity(player, SCOREBOARD)?;
    if world.contains(scoreboard) {
        score::increment(world, scoreboard)?;
    } else {
        log::warn!("Player {player:?} has no scoreboard, hit not scored");
    }

    let prior = world.position(ice)?;
    let explosion = world.spawn(&[EXPLOSION])?;
    world.set_position(explosion, prior)?;

    world.set_attr(ice, AttrKey::X, context.config.arena.off_screen_x)?;
    let spawn = context.config.arena.ice_spawn;
    world.delay(ice, context.config.arena.respawn_delay, move |world, ice| respawn(world, ice, spawn))?;
    log::debug!("Ice {ice:?} hit by {player:?} at ({}, {})", prior.x, prior.y);
    Ok(())
}

/// Move the ice to a random spot: `x` in `[x, x + w)`, `y` in `[y, y + h - height)`
pub fn respawn(world: &mut World, ice: EntityId, range: Rect) -> EngineResult<()> {
    let height = world.get_f32(ice, AttrKey::H)?;
    let rng = world.rng();
    let x = random_in(rng, range.x, range.right());
    let y = random_in(rng, range.y, range.bottom() - height);
    world.set_position(ice, Vec2::new(x, y))
}

fn random_in(rng: &mut impl Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{PLAYER, SCORE};
    use crate::test_support::{step, world_with_game};
    use arcade_engine::ecs::components::place;

    fn assert_in_spawn_range(world: &World, ice: EntityId, range: Rect) {
        let bounds = world.bounds(ice).unwrap();
        assert!(bounds.x >= range.x && bounds.x < range.right(), "x = {}", bounds.x);
        assert!(bounds.y >= range.y && bounds.y < range.bottom() - bounds.h, "y = {}", bounds.y);
    }

    #[test]
    fn test_spawns_in_range_with_crack_sprite() {
        let (mut world, context) = world_with_game();
        for _ in 0..20 {
            let ice = world.spawn(&[ICE]).unwrap();
            assert_in_spawn_range(&world, ice, context.config.arena.ice_spawn);
            let sprite = world.get_text(ice, AttrKey::Sprite).unwrap();
            assert!(context.config.gameplay.ice_sprites.iter().any(|s| s == sprite));
            assert_eq!(world.get_tags(ice, AttrKey::CollisionTag).unwrap(), CollisionTags::TARGET);
        }
    }

    #[test]
    fn test_degenerate_range_uses_low_edge() {
        let (mut world, _) = world_with_game();
        let ice = world.spawn(&[ICE]).unwrap();
        respawn(&mut world, ice, Rect::new(40.0, 50.0, 0.0, 10.0)).unwrap();
        assert_eq!(world.position(ice).unwrap(), Vec2::new(40.0, 50.0));
    }

    #[test]
    fn test_hit_scores_parks_and_respawns() {
        let (mut world, context) = world_with_game();
        let scoreboard = world.spawn(&[SCORE]).unwrap();
        let player = world.spawn(&[PLAYER]).unwrap();
        world.set_attr(player, SCOREBOARD, scoreboard).unwrap();
        place(&mut world, player, Rect::new(110.0, 300.0, 64.0, 64.0)).unwrap();

        let ice = world.spawn(&[ICE]).unwrap();
        world.set_position(ice, Vec2::new(120.0, 310.0)).unwrap();

        let report = step(&mut world, 1.0 / 60.0);
        assert_eq!(report.hits, 1);
        assert_eq!(score::value(&world, scoreboard).unwrap(), 1);
        assert_eq!(world.get_f32(ice, AttrKey::X).unwrap(), context.config.arena.off_screen_x);

        let explosions: Vec<_> = world.with_component(EXPLOSION).collect();
        assert_eq!(explosions.len(), 1);
        assert_eq!(world.position(explosions[0]).unwrap(), Vec2::new(120.0, 310.0));

        // Parked: still overlapping nothing, no further scoring
        step(&mut world, 0.5);
        assert_eq!(score::value(&world, scoreboard).unwrap(), 1);

        // Player leaves so the respawned crack cannot be hit again straight away
        place(&mut world, player, Rect::new(820.0, 300.0, 64.0, 64.0)).unwrap();
        step(&mut world, 0.6);
        assert_in_spawn_range(&world, ice, context.config.arena.ice_spawn);
        assert_eq!(world.pending_delays(ice), 0);
    }

    #[test]
    fn test_hit_while_off_screen_is_ignored() {
        let (mut world, context) = world_with_game();
        let scoreboard = world.spawn(&[SCORE]).unwrap();
        let player = world.spawn(&[PLAYER]).unwrap();
        world.set_attr(player, SCOREBOARD, scoreboard).unwrap();
        let ice = world.spawn(&[ICE]).unwrap();
        world.set_attr(ice, AttrKey::X, context.config.arena.off_screen_x).unwrap();

        on_hit(&mut world, ice, player, &context).unwrap();
        assert_eq!(score::value(&world, scoreboard).unwrap(), 0);
        assert_eq!(world.pending_delays(ice), 0);
    }
}
