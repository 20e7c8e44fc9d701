//! Rest timer state transitions.

use super::types::{Millis, RestTimerState};

impl RestTimerState {
    /// A running timer started at `now`.
    pub fn start(
        now: Millis,
        duration: u32,
        exercise_id: Option<String>,
        set_number: Option<u32>,
    ) -> Self {
        Self {
            active: true,
            start_time: now,
            duration,
            exercise_id,
            set_number,
        }
    }

    /// Stop the timer, keeping its duration for the next start.
    pub fn stop(&mut self) {
        self.active = false;
        self.exercise_id = None;
        self.set_number = None;
    }

    /// Add (or with a negative value, remove) rest time.
    pub fn extend(&mut self, seconds: i64) {
        let duration = i64::from(self.duration)
            .saturating_add(seconds)
            .clamp(0, i64::from(u32::MAX));
        self.duration = duration as u32;
    }

    /// Whole seconds left, rounded up. Zero when inactive or elapsed.
    pub fn remaining_seconds(&self, now: Millis) -> u32 {
        if !self.active {
            return 0;
        }

        let elapsed = now.saturating_sub(self.start_time).max(0);
        let remaining = i64::from(self.duration) * 1000 - elapsed;
        if remaining <= 0 {
            0
        } else {
            ((remaining + 999) / 1000) as u32
        }
    }

    /// Whether a running timer has reached zero.
    pub fn is_finished(&self, now: Millis) -> bool {
        self.active && self.remaining_seconds(now) == 0
    }
}
