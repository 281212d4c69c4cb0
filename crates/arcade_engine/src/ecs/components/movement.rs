//! Movement components
//!
//! `Motion` integrates a constant velocity each tick. `Multiway` moves the
//! entity along the headings of whichever bound actions are held. Both go
//! through [`move_to`], which publishes `Moved` with the previous position so
//! listeners such as a bounds check can veto the step.

use crate::ecs::attributes::{AttrKey, Capabilities};
use crate::ecs::component::ComponentDef;
use crate::ecs::components::spatial::SPATIAL;
use crate::ecs::{EntityId, World};
use crate::engine::EngineResult;
use crate::events::{args, Event, EventArg, EventKind, Target};
use crate::foundation::math::{heading, Vec2};
use crate::input::Controls;

/// Constant velocity component name
pub const MOTION: &str = "Motion";

/// Keyboard driven movement component name
pub const MULTIWAY: &str = "Multiway";

pub(crate) fn motion_definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(AttrKey::VelocityX, 0.0_f32)
        .owns(AttrKey::VelocityY, 0.0_f32)
        .on_tick(|world, entity, dt| {
            let velocity = Vec2::new(
                world.get_f32(entity, AttrKey::VelocityX)?,
                world.get_f32(entity, AttrKey::VelocityY)?,
            );
            if velocity == Vec2::zeros() {
                return Ok(());
            }
            let position = world.position(entity)?;
            move_to(world, entity, position + velocity * dt)
        })
}

pub(crate) fn multiway_definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[SPATIAL])
        .owns(AttrKey::Speed, 0.0_f32)
        .owns(AttrKey::Controls, Controls::new())
        .grants(Capabilities::KEYBOARD)
        .on_tick(|world, entity, dt| {
            let speed = world.get_f32(entity, AttrKey::Speed)?;
            let controls = world.get_controls(entity, AttrKey::Controls)?;
            let direction = controls
                .directions
                .iter()
                .filter(|binding| world.input().is_active(&binding.action))
                .fold(Vec2::zeros(), |sum, binding| sum + heading(binding.heading));
            if direction == Vec2::zeros() || speed == 0.0 {
                return Ok(());
            }
            let position = world.position(entity)?;
            move_to(world, entity, position + direction * speed * dt)
        })
}

/// Move an entity and publish `Moved` with its previous position
pub fn move_to(world: &mut World, entity: EntityId, position: Vec2) -> EngineResult<()> {
    let old = world.position(entity)?;
    if old == position {
        return Ok(());
    }
    world.set_position(entity, position)?;
    let event = Event::new(EventKind::Moved, world.elapsed())
        .with_arg(args::ENTITY, EventArg::Entity(entity))
        .with_arg(args::OLD_POSITION, EventArg::Position(old.x, old.y));
    world.publish(Target::Entity(entity), event)
}

/// Set the velocity of a `Motion` entity
pub fn set_velocity(world: &mut World, entity: EntityId, velocity: Vec2) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::VelocityX, velocity.x)?;
    world.set_attr(entity, AttrKey::VelocityY, velocity.y)
}

/// Configure speed and bindings of a `Multiway` entity
pub fn configure_multiway(world: &mut World, entity: EntityId, speed: f32, controls: Controls) -> EngineResult<()> {
    world.set_attr(entity, AttrKey::Speed, speed)?;
    world.set_attr(entity, AttrKey::Controls, controls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_motion_integrates_velocity() {
        let mut world = World::with_builtins(0).unwrap();
        let entity = world.spawn(&[MOTION]).unwrap();
        set_velocity(&mut world, entity, Vec2::new(0.0, -100.0)).unwrap();

        world.run_tick_hooks(0.5).unwrap();
        assert_relative_eq!(world.position(entity).unwrap(), Vec2::new(0.0, -50.0));
    }

    #[test]
    fn test_multiway_moves_along_held_headings() {
        let mut world = World::with_builtins(0).unwrap();
        let entity = world.spawn(&[MULTIWAY]).unwrap();
        configure_multiway(&mut world, entity, 300.0, Controls::four_way("up", "down", "right", "left")).unwrap();

        world.set_input(InputState::new().holding("right"));
        world.run_tick_hooks(0.1).unwrap();
        let position = world.position(entity).unwrap();
        assert_relative_eq!(position.x, 30.0, epsilon = 1e-4);
        assert_relative_eq!(position.y, 0.0, epsilon = 1e-4);

        world.set_input(InputState::new().holding("up"));
        world.run_tick_hooks(0.1).unwrap();
        assert_relative_eq!(world.position(entity).unwrap().y, -30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_idle_multiway_does_not_move() {
        let mut world = World::with_builtins(0).unwrap();
        let entity = world.spawn(&[MULTIWAY]).unwrap();
        configure_multiway(&mut world, entity, 300.0, Controls::four_way("up", "down", "right", "left")).unwrap();
        let moves = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&moves);
        world.events_mut().subscribe(Target::Entity(entity), EventKind::Moved, move |_, _| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        world.run_tick_hooks(0.1).unwrap();
        assert_eq!(*moves.borrow(), 0);
    }

    #[test]
    fn test_move_to_reports_old_position() {
        let mut world = World::with_builtins(0).unwrap();
        let entity = world.spawn(&[SPATIAL]).unwrap();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        world.events_mut().subscribe(Target::Entity(entity), EventKind::Moved, move |_, event| {
            *sink.borrow_mut() = event.get_position(args::OLD_POSITION);
            Ok(())
        });

        move_to(&mut world, entity, Vec2::new(5.0, 6.0)).unwrap();
        assert_eq!(*seen.borrow(), Some((0.0, 0.0)));
    }
}
