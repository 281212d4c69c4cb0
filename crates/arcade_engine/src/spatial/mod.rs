//! Spatial partitioning for broad-phase collision detection
//!
//! Provides the interchangeable strategies the collision detector uses to
//! cull pairs of boxes that cannot possibly overlap.

pub mod spatial_query;

pub use spatial_query::{BroadPhase, BroadPhaseKind, BruteForce, UniformGrid};
