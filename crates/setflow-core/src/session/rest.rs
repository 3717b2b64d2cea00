//! Countdown between exercises.
//!
//! Started by the engine with the just-completed exercise's rest
//! duration. Reaching zero and `skip()` are equivalent terminations:
//! both tell the engine to begin the next exercise.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestController {
    total_secs: u32,
    remaining_secs: u32,
}

impl RestController {
    /// Begin a rest countdown of `secs` seconds.
    pub fn start(secs: u32) -> Self {
        Self {
            total_secs: secs,
            remaining_secs: secs,
        }
    }

    /// Advance the countdown. Returns true exactly once, when the rest
    /// period finishes.
    pub fn tick(&mut self, delta_secs: u32) -> bool {
        if self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(delta_secs);
        self.remaining_secs == 0
    }

    /// Terminate the rest period immediately, as if it expired at zero.
    pub fn skip(&mut self) {
        self.remaining_secs = 0;
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_once_at_zero() {
        let mut rest = RestController::start(10);
        assert!(!rest.tick(6));
        assert!(rest.tick(4));
        assert!(!rest.tick(1));
        assert_eq!(rest.remaining_secs(), 0);
    }

    #[test]
    fn skip_matches_natural_expiry() {
        let mut skipped = RestController::start(30);
        skipped.skip();

        let mut expired = RestController::start(30);
        expired.tick(30);

        assert_eq!(skipped.remaining_secs(), expired.remaining_secs());
    }

    #[test]
    fn zero_length_rest_never_signals() {
        let mut rest = RestController::start(0);
        assert!(!rest.tick(1));
    }
}
