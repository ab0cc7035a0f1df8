//! Monotonic frame clock and pacing for the main loop.

use std::time::{Duration, Instant};

pub struct FrameClock {
    origin: Instant,
    budget: Duration,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            origin: Instant::now(),
            budget: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        }
    }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Sleep time left for a frame that began at `frame_start`.
    pub fn remaining(&self, frame_start: Instant) -> Duration {
        self.budget.saturating_sub(frame_start.elapsed())
    }
}
