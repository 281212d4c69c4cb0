//! Headless host
//!
//! Drives the engine from a scripted input timeline instead of a window. Used
//! by the binary and handy for reproducing a session in tests.

use crate::config::{DemoConfig, DemoStep};
use arcade_engine::ecs::RenderItem;
use arcade_engine::input::InputState;
use arcade_engine::FrameSource;

/// Fixed-step frames with input taken from a script
#[derive(Debug, Clone)]
pub struct ScriptedFrames {
    frames: u64,
    delta: f32,
    steps: Vec<DemoStep>,
    frame: u64,
    held: InputState,
}

impl ScriptedFrames {
    /// Build from the demo section of the configuration
    pub fn from_config(config: &DemoConfig) -> Self {
        let mut steps = config.steps.clone();
        steps.sort_by_key(|step| step.frame);
        Self {
            frames: config.frames,
            delta: config.delta,
            steps,
            frame: 0,
            held: InputState::new(),
        }
    }

    /// Frames handed out so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Option<(f32, InputState)> {
        if self.frame >= self.frames {
            return None;
        }
        let mut input = self.held.clone();
        for step in self.steps.iter().filter(|step| step.frame == self.frame) {
            for action in &step.hold {
                self.held.hold(action.clone());
                input.hold(action.clone());
            }
            for action in &step.release {
                self.held.release(action);
                input.release(action);
            }
            for action in &step.press {
                input.press(action.clone());
            }
        }
        self.frame += 1;
        Some((self.delta, input))
    }

    fn present(&mut self, items: &[RenderItem]) {
        log::trace!("Frame {}: {} items to draw", self.frame, items.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(frame: u64, hold: &[&str], release: &[&str], press: &[&str]) -> DemoStep {
        let owned = |names: &[&str]| names.iter().map(|s| (*s).to_string()).collect();
        DemoStep {
            frame,
            hold: owned(hold),
            release: owned(release),
            press: owned(press),
        }
    }

    #[test]
    fn test_script_applies_in_order_and_ends() {
        let config = DemoConfig {
            frames: 4,
            delta: 0.25,
            steps: vec![step(2, &[], &["right"], &[]), step(1, &["right"], &[], &["fire"])],
        };
        let mut frames = ScriptedFrames::from_config(&config);

        let (delta, input) = frames.next_frame().unwrap();
        assert_eq!(delta, 0.25);
        assert!(!input.is_active("right"));

        let (_, input) = frames.next_frame().unwrap();
        assert!(input.is_active("right"));
        assert_eq!(input.pressed(), &["fire".to_string()]);

        let (_, input) = frames.next_frame().unwrap();
        assert!(!input.is_active("right"));
        assert!(input.pressed().is_empty());

        assert!(frames.next_frame().is_some());
        assert!(frames.next_frame().is_none());
        assert_eq!(frames.frame(), 4);
    }
}
