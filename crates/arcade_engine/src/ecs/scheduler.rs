//! Frame scheduling
//!
//! One call to [`FrameScheduler::tick`] advances the world by one frame. The
//! stages always run in the same order:
//!
//! 1. **Input**: store the snapshot, publish a global `KeyDown` per press
//! 2. **Update**: advance the clock, fire due delays, run per-entity tick
//!    hooks, publish a global `EnterFrame`
//! 3. **Collision**: detect overlaps, publish `Hit` events
//! 4. **Cleanup**: remove every entity destroyed during the tick
//!
//! Nothing is parallel here: handlers freely mutate the world and publish
//! more events, so the order above is the whole contract.

use crate::ecs::World;
use crate::engine::{EngineError, EngineResult};
use crate::events::{args, Event, EventArg, EventKind, Target};
use crate::input::InputState;
use crate::physics::CollisionDetector;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Frame delta in seconds
    pub delta: f32,
    /// Delayed callbacks fired
    pub delays_fired: usize,
    /// Hit events delivered
    pub hits: usize,
    /// Entities removed in the cleanup stage
    pub destroyed: usize,
}

/// Drives the world through the tick stages
pub struct FrameScheduler {
    collisions: CollisionDetector,
    tick_count: u64,
}

impl FrameScheduler {
    /// Create a scheduler around a collision detector
    pub fn new(collisions: CollisionDetector) -> Self {
        Self {
            collisions,
            tick_count: 0,
        }
    }

    /// Number of ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The collision detector
    pub fn collisions(&self) -> &CollisionDetector {
        &self.collisions
    }

    /// Advance the world by `delta_time` seconds.
    ///
    /// A negative or non-finite delta is rejected before anything runs. A
    /// handler error aborts the rest of the tick and is returned; entities
    /// already marked for destruction are swept on the next tick.
    pub fn tick(&mut self, world: &mut World, delta_time: f32, input: &InputState) -> EngineResult<TickReport> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(EngineError::InvalidDelta(delta_time));
        }
        self.tick_count += 1;

        // Input
        world.set_input(input.clone());
        for action in input.pressed() {
            let event = Event::new(EventKind::KeyDown, world.elapsed())
                .with_arg(args::ACTION, EventArg::Action(action.clone()));
            world.publish(Target::Global, event)?;
        }

        // Update
        world.advance_clock(delta_time);
        let delays_fired = world.run_due_delays()?;
        world.run_tick_hooks(delta_time)?;
        let frame = Event::new(EventKind::EnterFrame, world.elapsed())
            .with_arg(args::DELTA, EventArg::Seconds(delta_time));
        world.publish(Target::Global, frame)?;

        // Collision
        let hits = self.collisions.run(world)?;

        // Cleanup
        let destroyed = world.flush_destroyed()?;

        Ok(TickReport {
            tick: self.tick_count,
            delta: delta_time,
            delays_fired,
            hits,
            destroyed,
        })
    }
}
