//! Input state
//!
//! The host translates devices into logical action names. Each tick the
//! scheduler receives one [`InputState`]: the actions currently held plus the
//! discrete presses that happened since the previous frame.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snapshot of logical input for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    active: HashSet<String>,
    pressed: Vec<String>,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action as held (builder pattern)
    pub fn holding(mut self, action: impl Into<String>) -> Self {
        self.hold(action);
        self
    }

    /// Record a discrete press (builder pattern)
    pub fn pressing(mut self, action: impl Into<String>) -> Self {
        self.press(action);
        self
    }

    /// Mark an action as held
    pub fn hold(&mut self, action: impl Into<String>) {
        self.active.insert(action.into());
    }

    /// Mark an action as released
    pub fn release(&mut self, action: &str) {
        self.active.remove(action);
    }

    /// Record a discrete press
    pub fn press(&mut self, action: impl Into<String>) {
        self.pressed.push(action.into());
    }

    /// Whether an action is currently held
    pub fn is_active(&self, action: &str) -> bool {
        self.active.contains(action)
    }

    /// Discrete presses this tick, in the order they happened
    pub fn pressed(&self) -> &[String] {
        &self.pressed
    }

    /// Forget discrete presses, keeping held actions
    pub fn clear_presses(&mut self) {
        self.pressed.clear();
    }
}

/// A logical action that moves an entity along a heading while held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionBinding {
    /// Logical action name
    pub action: String,
    /// Heading in degrees: 0 = right, 90 = down, 180 = left, -90 = up
    pub heading: f32,
}

/// Input bindings for one controllable entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// Movement bindings
    pub directions: Vec<DirectionBinding>,
    /// Action that fires, if any
    pub fire: Option<String>,
}

impl Controls {
    /// Create empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action to a heading (builder pattern)
    pub fn bind(mut self, action: impl Into<String>, heading: f32) -> Self {
        self.directions.push(DirectionBinding {
            action: action.into(),
            heading,
        });
        self
    }

    /// Set the fire action (builder pattern)
    pub fn with_fire(mut self, action: impl Into<String>) -> Self {
        self.fire = Some(action.into());
        self
    }

    /// Four-way bindings with the given action names
    pub fn four_way(up: &str, down: &str, right: &str, left: &str) -> Self {
        Self::new()
            .bind(up, -90.0)
            .bind(down, 90.0)
            .bind(right, 0.0)
            .bind(left, 180.0)
    }
}
