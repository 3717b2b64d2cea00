//! Countdown clock for a single time-based exercise.
//!
//! Pure delta arithmetic -- no wall clock, no thread. The session engine
//! (or a test) feeds it `tick(delta_secs)` from one scheduling source and
//! reacts when the countdown reports expiry. The timer never decides what
//! happens next.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTimer {
    total_secs: u32,
    remaining_secs: u32,
    running: bool,
}

impl ExerciseTimer {
    /// Create a stopped timer armed with the exercise's target duration.
    pub fn new(duration_secs: u32) -> Self {
        Self {
            total_secs: duration_secs,
            remaining_secs: duration_secs,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.remaining_secs > 0 {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume from the same remaining value the pause left behind.
    pub fn resume(&mut self) {
        if self.remaining_secs > 0 {
            self.running = true;
        }
    }

    /// Advance the countdown. Returns true exactly once, on the tick
    /// that reaches zero. No-op while paused, so repeated ticks across
    /// a pause boundary cannot lose or double-apply time.
    pub fn tick(&mut self, delta_secs: u32) -> bool {
        if !self.running || self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(delta_secs);
        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    /// Seconds already counted down.
    pub fn elapsed_secs(&self) -> u32 {
        self.total_secs - self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
