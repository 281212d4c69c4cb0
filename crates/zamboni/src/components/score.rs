//! Scoreboard component

use super::keys::SCORE as SCORE_KEY;
use arcade_engine::ecs::components::{set_text, TEXT};
use arcade_engine::ecs::{ComponentDef, EntityId, World};
use arcade_engine::events::{args, Event, EventArg, EventKind, Target};
use arcade_engine::EngineResult;

/// Component name
pub const SCORE: &str = "Score";

fn label(score: i64) -> String {
    format!("Score: {score}")
}

pub(crate) fn definition() -> ComponentDef {
    ComponentDef::new()
        .requires(&[TEXT])
        .owns(SCORE_KEY, 0_i64)
        .on_init(|world, entity| set_text(world, entity, label(0)))
}

/// Current score of a scoreboard
pub fn value(world: &World, scoreboard: EntityId) -> EngineResult<i64> {
    world.get_int(scoreboard, SCORE_KEY)
}

/// Add one point, refresh the text and broadcast `ScoreChanged`
pub fn increment(world: &mut World, scoreboard: EntityId) -> EngineResult<i64> {
    let score = value(world, scoreboard)? + 1;
    world.set_attr(scoreboard, SCORE_KEY, score)?;
    set_text(world, scoreboard, label(score))?;
    log::debug!("Scoreboard {scoreboard:?} now at {score}");

    let event = Event::new(EventKind::ScoreChanged, world.elapsed())
        .with_arg(args::ENTITY, EventArg::Entity(scoreboard))
        .with_arg(args::VALUE, EventArg::Count(score));
    world.publish(Target::Global, event)?;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::world_with_game;
    use arcade_engine::ecs::AttrKey;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_at_zero() {
        let (mut world, _) = world_with_game();
        let scoreboard = world.spawn(&[SCORE]).unwrap();
        assert_eq!(value(&world, scoreboard).unwrap(), 0);
        assert_eq!(world.get_text(scoreboard, AttrKey::Text).unwrap(), "Score: 0");
    }

    #[test]
    fn test_increment_updates_text_and_broadcasts() {
        let (mut world, _) = world_with_game();
        let scoreboard = world.spawn(&[SCORE]).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        world.events_mut().subscribe(Target::Global, EventKind::ScoreChanged, move |_, event| {
            sink.borrow_mut().push(event.get_count(args::VALUE));
            Ok(())
        });

        increment(&mut world, scoreboard).unwrap();
        assert_eq!(increment(&mut world, scoreboard).unwrap(), 2);
        assert_eq!(world.get_text(scoreboard, AttrKey::Text).unwrap(), "Score: 2");
        assert_eq!(*seen.borrow(), vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_increment_on_missing_scoreboard_fails() {
        let (mut world, _) = world_with_game();
        let scoreboard = world.spawn(&[SCORE]).unwrap();
        world.destroy(scoreboard).unwrap();
        world.flush_destroyed().unwrap();
        assert!(increment(&mut world, scoreboard).is_err());
    }
}
