// src/presenter/clock.rs
//! Fixed-rate cadence for the presentation loop.

use log::trace;
use std::thread;
use std::time::{Duration, Instant};

/// Sleeps away whatever is left of each frame slot.
///
/// A cycle that overruns its slot does not try to catch up: the next slot
/// starts from now, so a slow cycle drops frames instead of bunching them.
pub struct FrameClock {
    frame_duration: Duration,
    next_deadline: Instant,
    overruns: u64,
}

impl FrameClock {
    pub fn with_frame_duration(frame_duration: Duration) -> Self {
        Self {
            frame_duration,
            next_deadline: Instant::now() + frame_duration,
            overruns: 0,
        }
    }

    /// Number of cycles that ran past their slot.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Waits for the end of the current slot. Returns how long it slept.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        if now >= self.next_deadline {
            self.overruns += 1;
            trace!(
                "FrameClock: Overran slot by {:?}",
                now - self.next_deadline
            );
            self.next_deadline = now + self.frame_duration;
            return Duration::ZERO;
        }

        let remaining = self.next_deadline - now;
        thread::sleep(remaining);
        self.next_deadline += self.frame_duration;
        remaining
    }
}
