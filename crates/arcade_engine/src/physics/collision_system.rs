//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! [`CollisionDetector::detect`] is pure and works on plain bounding boxes;
//! [`CollisionDetector::run`] is the ECS wrapper that reads the world and
//! dispatches `Hit` events.

use crate::ecs::world::Collidable;
use crate::ecs::{EntityId, World};
use crate::engine::EngineResult;
use crate::events::{args, Event, EventArg, EventKind, Target};
use crate::physics::collision_layers::CollisionTags;
use crate::spatial::{BroadPhase, BroadPhaseKind};

/// One entity learning that it overlaps another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReport {
    /// Entity that receives the `Hit` event
    pub interested: EntityId,
    /// Entity it overlaps
    pub other: EntityId,
}

/// Core collision detection system (GEA 13.3)
pub struct CollisionDetector {
    broad_phase: Box<dyn BroadPhase>,
}

impl CollisionDetector {
    /// Create a detector using the given broad phase
    pub fn new(broad_phase: Box<dyn BroadPhase>) -> Self {
        log::debug!("Collision detector using {} broad phase", broad_phase.name());
        Self { broad_phase }
    }

    /// Create a detector from configuration
    pub fn from_kind(kind: BroadPhaseKind) -> Self {
        Self::new(kind.build())
    }

    /// Name of the active broad phase
    pub fn broad_phase_name(&self) -> &'static str {
        self.broad_phase.name()
    }

    /// Find every hit between `collidables`.
    ///
    /// Boxes that merely touch do not overlap. A pair yields at most one
    /// report per direction, and only for the side whose interests include
    /// the other side's tag. Reports follow the order of `collidables`.
    pub fn detect(&mut self, collidables: &[Collidable]) -> Vec<HitReport> {
        let boxes: Vec<_> = collidables.iter().map(|collidable| collidable.bounds).collect();
        let mut reports = Vec::new();
        for (i, j) in self.broad_phase.candidate_pairs(&boxes) {
            let (a, b) = (&collidables[i], &collidables[j]);
            if !a.bounds.intersects(&b.bounds) {
                continue;
            }
            if CollisionTags::wants_hit(a.interests, b.tag) {
                reports.push(HitReport { interested: a.entity, other: b.entity });
            }
            if CollisionTags::wants_hit(b.interests, a.tag) {
                reports.push(HitReport { interested: b.entity, other: a.entity });
            }
        }
        reports
    }

    /// Detect hits in the world and publish a `Hit` to each interested entity.
    ///
    /// Returns the number of events delivered.
    pub fn run(&mut self, world: &mut World) -> EngineResult<usize> {
        let reports = self.detect(&world.collidables());
        let mut delivered = 0;
        for report in reports {
            // Earlier hit handlers may have destroyed either side
            if !world.is_active(report.interested) || !world.is_active(report.other) {
                continue;
            }
            let event = Event::new(EventKind::Hit, world.elapsed()).with_arg(args::OTHER, EventArg::Entity(report.other));
            world.publish(Target::Entity(report.interested), event)?;
            delivered += 1;
        }
        if delivered > 0 {
            log::trace!("Delivered {delivered} hit events");
        }
        Ok(delivered)
    }
}
