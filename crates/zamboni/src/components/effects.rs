//! Visual effect components: fading, spinning and explosions

use super::keys::{FADE_SPEED, ROTATION_SPEED};
use crate::GameContext;
use arcade_engine::ecs::components::{RENDERABLE, SPATIAL};
use arcade_engine::ecs::{AttrKey, ComponentDef};
use arcade_engine::events::{args, Event, EventArg, EventKind, Target};
use arcade_engine::EngineError;
use rand::seq::SliceRandom;
use std::rc::Rc;

/// Fades the entity out and removes it once practically invisible
pub const FADE_OUT: &str = "FadeOut";

/// Spins the entity continuously
pub const ROTATE: &str = "Rotate";

/// Short lived explosion sprite
pub const EXPLOSION: &str = "Explosion";

pub(crate) fn fade_out(context: &Rc<GameContext>) -> ComponentDef {
    let threshold = context.config.gameplay.visibility_threshold;
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(FADE_SPEED, 0.0_f32)
        .on_tick(move |world, entity, dt| {
            let speed = world.get_f32(entity, FADE_SPEED)?;
            let alpha = (world.get_f32(entity, AttrKey::Alpha)? - speed * dt).max(0.0);
            world.set_attr(entity, AttrKey::Alpha, alpha)?;
            if alpha < threshold {
                let event = Event::new(EventKind::Faded, world.elapsed()).with_arg(args::ENTITY, EventArg::Entity(entity));
                world.publish(Target::Entity(entity), event)?;
                world.destroy(entity)?;
            }
            Ok(())
        })
}

pub(crate) fn rotate() -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(ROTATION_SPEED, 0.0_f32)
        .on_tick(|world, entity, dt| {
            let speed = world.get_f32(entity, ROTATION_SPEED)?;
            if speed == 0.0 {
                return Ok(());
            }
            let rotation = world.get_f32(entity, AttrKey::Rotation)?;
            world.set_attr(entity, AttrKey::Rotation, rotation + speed * dt)
        })
}

pub(crate) fn explosion(context: &Rc<GameContext>) -> ComponentDef {
    let context = Rc::clone(context);
    ComponentDef::new()
        .requires(&[RENDERABLE, FADE_OUT])
        .on_init(move |world, entity| {
            let sprite = context
                .config
                .gameplay
                .explosion_sprites
                .choose(world.rng())
                .cloned()
                .ok_or_else(|| EngineError::ApplicationError("no explosion sprites configured".to_string()))?;
            context.atlas.show(world, entity, &sprite)?;
            world.set_attr(entity, FADE_SPEED, context.config.gameplay.fade_speed)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{step, world_with_game};
    use std::cell::Cell;

    #[test]
    fn test_fade_is_strictly_decreasing_then_destroyed_once() {
        let (mut world, _) = world_with_game();
        let entity = world.spawn(&[FADE_OUT]).unwrap();
        world.set_attr(entity, FADE_SPEED, 6.0_f32).unwrap();

        let faded = Rc::new(Cell::new(0));
        let counter = Rc::clone(&faded);
        world.events_mut().subscribe(Target::Entity(entity), EventKind::Faded, move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        let destroyed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&destroyed);
        world.events_mut().subscribe(Target::Global, EventKind::Destroyed, move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        let mut previous = world.get_f32(entity, AttrKey::Alpha).unwrap();
        let mut ticks = 0;
        while world.contains(entity) {
            step(&mut world, 1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 100, "never faded");
            if let Ok(alpha) = world.get_f32(entity, AttrKey::Alpha) {
                assert!(alpha < previous, "alpha went from {previous} to {alpha}");
                previous = alpha;
            }
        }
        // 1.0 / (6.0 / 60) = 10 ticks to reach 0.0, threshold crossed on the last one
        assert_eq!(ticks, 10);
        step(&mut world, 1.0 / 60.0);
        assert_eq!(faded.get(), 1);
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_rotate_is_unbounded() {
        let (mut world, _) = world_with_game();
        let entity = world.spawn(&[ROTATE]).unwrap();
        world.set_attr(entity, ROTATION_SPEED, 720.0_f32).unwrap();
        step(&mut world, 1.0);
        assert_eq!(world.get_f32(entity, AttrKey::Rotation).unwrap(), 720.0);
    }

    #[test]
    fn test_explosion_picks_configured_sprite() {
        let (mut world, context) = world_with_game();
        let entity = world.spawn(&[EXPLOSION]).unwrap();
        let sprite = world.get_text(entity, AttrKey::Sprite).unwrap().to_string();
        assert!(context.config.gameplay.explosion_sprites.contains(&sprite));
        assert_eq!(world.get_f32(entity, FADE_SPEED).unwrap(), context.config.gameplay.fade_speed);
    }
}
