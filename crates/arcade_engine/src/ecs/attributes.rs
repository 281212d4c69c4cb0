//! Entity attributes
//!
//! Every entity carries a bag of typed attributes. Each key is owned by
//! exactly one attached component (see [`ComponentDef::owns`]), which is what
//! keeps two components from silently overwriting each other's state.
//!
//! [`ComponentDef::owns`]: crate::ecs::ComponentDef::owns

use crate::ecs::EntityId;
use crate::foundation::math::Rect;
use crate::input::Controls;
use crate::physics::CollisionTags;
use bitflags::bitflags;

/// Attribute key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKey {
    /// Left edge in screen space
    X,
    /// Top edge in screen space
    Y,
    /// Width
    W,
    /// Height
    H,
    /// Rotation in degrees, unbounded
    Rotation,
    /// Opacity, 1.0 = fully visible
    Alpha,
    /// Horizontal velocity in units per second
    VelocityX,
    /// Vertical velocity in units per second
    VelocityY,
    /// Movement speed for input-driven movement
    Speed,
    /// Logical action bindings for input-driven movement
    Controls,
    /// Visible sprite identifier
    Sprite,
    /// Displayed text
    Text,
    /// What this entity is, for collision filtering
    CollisionTag,
    /// Which tags this entity wants hit events for
    HitInterests,
    /// Elapsed time at which the lifetime started
    SpawnedAt,
    /// Lifetime in seconds, zero or less means forever
    Lifetime,
    /// Game-defined key
    Custom(&'static str),
}

/// Attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Floating point number
    Float(f32),
    /// Time stamp or other double precision value
    Time(f64),
    /// Integer
    Int(i64),
    /// Boolean flag
    Bool(bool),
    /// Text
    Text(String),
    /// Handle to another entity
    Entity(EntityId),
    /// Rectangle
    Rect(Rect),
    /// Collision tag set
    Tags(CollisionTags),
    /// Input bindings
    Controls(Controls),
}

impl AttrValue {
    /// Human readable type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Time(_) => "time",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Entity(_) => "entity",
            Self::Rect(_) => "rect",
            Self::Tags(_) => "tags",
            Self::Controls(_) => "controls",
        }
    }

    /// Get as f32
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as f64 time stamp
    pub fn as_time(&self) -> Option<f64> {
        match self {
            Self::Time(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Get as entity handle
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::Entity(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as rectangle
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as collision tags
    pub fn as_tags(&self) -> Option<CollisionTags> {
        match self {
            Self::Tags(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as input bindings
    pub fn as_controls(&self) -> Option<&Controls> {
        match self {
            Self::Controls(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Time(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<EntityId> for AttrValue {
    fn from(value: EntityId) -> Self {
        Self::Entity(value)
    }
}

impl From<Rect> for AttrValue {
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<CollisionTags> for AttrValue {
    fn from(value: CollisionTags) -> Self {
        Self::Tags(value)
    }
}

impl From<Controls> for AttrValue {
    fn from(value: Controls) -> Self {
        Self::Controls(value)
    }
}

bitflags! {
    /// Capabilities an entity gains from its attached components
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Has a bounding box tracked by the collision detector
        const COLLIDABLE = 1 << 0;
        /// Has something for the host to paint (sprite or text)
        const RENDERABLE = 1 << 1;
        /// Reacts to discrete key presses
        const KEYBOARD = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        assert_eq!(AttrValue::from(2.5_f32).as_f32(), Some(2.5));
        assert_eq!(AttrValue::from("Score: 1").as_text(), Some("Score: 1"));
        assert_eq!(AttrValue::from(3_i64).as_f32(), None);
        assert_eq!(AttrValue::from(true).type_name(), "bool");
    }
}
