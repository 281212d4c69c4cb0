//! Wall-clock helpers for hosts
//!
//! The simulation never reads the wall clock: the host measures frame time
//! and hands the delta to the scheduler. `Timer` summarises a host loop for
//! the shutdown log and `Stopwatch` times a whole session.

use std::time::Instant;

/// Counts presented frames against wall time since the loop started
pub struct Timer {
    started: Instant,
    frames: u64,
}

impl Timer {
    pub fn new() -> Self {
        Self { started: Instant::now(), frames: 0 }
    }

    /// Record one presented frame
    pub fn update(&mut self) {
        self.frames += 1;
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Frames per wall-clock second since `new`, 0 before any time passed
    pub fn average_fps(&self) -> f32 {
        let seconds = self.started.elapsed().as_secs_f32();
        if seconds > 0.0 {
            self.frames as f32 / seconds
        } else {
            0.0
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Always-running session stopwatch
pub struct Stopwatch(Instant);

impl Stopwatch {
    pub fn start_new() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed_millis(&self) -> f32 {
        self.0.elapsed().as_secs_f32() * 1000.0
    }
}
