//! Entity-Component-System implementation
//!
//! Entities are opaque handles. Components are named, stateless definitions
//! that own attribute keys on the entity and hook into its lifecycle. The
//! [`World`] holds everything; the [`FrameScheduler`] advances it one tick at
//! a time and the [`SceneManager`] swaps its contents wholesale.

pub mod attributes;
pub mod component;
pub mod components;
pub mod entity;
pub mod scene_manager;
pub mod scheduler;
pub mod world;

pub use attributes::{AttrKey, AttrValue, Capabilities};
pub use component::{ComponentDef, ComponentTable};
pub use entity::EntityId;
pub use scene_manager::SceneManager;
pub use scheduler::{FrameScheduler, TickReport};
pub use world::{Collidable, DelayId, RenderItem, World};
