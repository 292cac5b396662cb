// src/task/runner.rs
//! Runs a driver task on a dedicated background thread.

use super::{DriverTask, ShutdownToken};
use crate::bridge::DisplayHost;
use anyhow::{Context, Result};
use log::*;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Handle to a running driver task.
pub struct DriverThread {
    name: &'static str,
    shutdown: ShutdownToken,
    thread_handle: Option<JoinHandle<Result<()>>>,
}

impl DriverThread {
    /// Spawns `task` on a thread named after it.
    pub fn spawn(mut task: Box<dyn DriverTask>, host: DisplayHost) -> Result<Self> {
        let name = task.name();
        let shutdown = ShutdownToken::new();
        let token = shutdown.clone();

        let thread_handle = thread::Builder::new()
            .name(format!("driver-{}", name))
            .spawn(move || {
                info!("DriverThread: '{}' started", name);
                let result = task.run(host, token);
                match &result {
                    Ok(()) => info!("DriverThread: '{}' finished", name),
                    Err(e) => error!("DriverThread: '{}' failed: {:#}", name, e),
                }
                result
            })
            .context("Failed to spawn driver thread")?;

        debug!("DriverThread: '{}' spawned", name);
        Ok(Self {
            name,
            shutdown,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Cancels the task and waits up to `grace` for it to return.
    ///
    /// Returns the task's result if it finished in time. A task that ignores
    /// cancellation is detached and left to die with the process.
    pub fn stop(&mut self, grace: Duration) -> Option<Result<()>> {
        self.shutdown.cancel();
        let handle = self.thread_handle.take()?;

        let deadline = Instant::now() + grace;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        if !handle.is_finished() {
            warn!(
                "DriverThread: '{}' did not stop within {:?}, detaching",
                self.name, grace
            );
            return None;
        }

        match handle.join() {
            Ok(result) => Some(result),
            Err(panic) => {
                error!("DriverThread: '{}' panicked: {:?}", self.name, panic);
                Some(Err(anyhow::anyhow!("driver '{}' panicked", self.name)))
            }
        }
    }
}

impl Drop for DriverThread {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!("DriverThread: '{}' dropped while running", self.name);
            self.stop(Duration::ZERO);
        }
    }
}
