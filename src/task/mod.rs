// src/task/mod.rs
//! Driver tasks: the display-producing programs the simulator hosts.
//!
//! A driver task runs on its own thread. It receives a [`DisplayHost`], opens
//! exactly one display through it and keeps submitting images until its
//! [`ShutdownToken`] is cancelled.

pub mod demos;
pub mod runner;

pub use demos::{lookup, DRIVER_NAMES};
pub use runner::DriverThread;

use crate::bridge::DisplayHost;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// A display-producing program.
pub trait DriverTask: Send {
    /// Name used on the command line and in the window title.
    fn name(&self) -> &'static str;

    /// Runs until `shutdown` is cancelled or the task finishes on its own.
    fn run(&mut self, host: DisplayHost, shutdown: ShutdownToken) -> Result<()>;
}

/// Cooperative cancellation flag shared between the simulator and a driver task.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Sleeps for `duration` in short slices, returning early on cancellation.
    ///
    /// Returns `true` if the token was cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        const SLICE: Duration = Duration::from_millis(10);
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep((deadline - now).min(SLICE));
        }
    }
}
