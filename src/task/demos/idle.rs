//! A driver that never opens its display.
//!
//! Holds on to its host until cancelled, so the simulator sees neither a
//! bridge nor a dropped host and has to rely on its discovery timeout.

use crate::bridge::DisplayHost;
use crate::task::{DriverTask, ShutdownToken};
use anyhow::Result;
use log::info;
use std::time::Duration;

pub struct Idle;

impl DriverTask for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn run(&mut self, host: DisplayHost, shutdown: ShutdownToken) -> Result<()> {
        info!("Idle: Not opening a display");
        while !shutdown.sleep(Duration::from_millis(100)) {}
        drop(host);
        Ok(())
    }
}
