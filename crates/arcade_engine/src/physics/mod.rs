//! Collision detection
//!
//! Axis-aligned box overlap between collidable entities, filtered by
//! one-directional tag interests and reported as `Hit` events.

pub mod collision_layers;
pub mod collision_system;

pub use collision_layers::CollisionTags;
pub use collision_system::{CollisionDetector, HitReport};
