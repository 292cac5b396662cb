// src/presenter/mod.rs
//! The presentation loop.
//!
//! ```text
//! AwaitingFirstFrame ──found──▶ Running ──close / timeout / Ctrl+C──▶ ShuttingDown
//!         │                                                              ▲
//!         └───────────── discovery timeout (fatal) ──────────────────────┘
//! ```
//!
//! Runs on the thread that owns the window. Each `Running` cycle reads one
//! snapshot from the bridge, renders it and presents it, then sleeps out the
//! rest of its frame slot.

pub mod clock;
pub mod render;

pub use clock::FrameClock;

use crate::bridge::{handshake, BridgeDiscovery, Discovery, FramebufferBridge};
use crate::config::Config;
use crate::display::{
    DisplayError, DisplayEvent, DisplayFrame, DisplayManager, DriverRequest, DriverResponse,
};
use crate::signal;
use crate::task::{DriverTask, DriverThread};
use log::{debug, error, info, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Presentation loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    AwaitingFirstFrame,
    Running,
    ShuttingDown,
}

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    WindowClosed,
    TimedOut,
    Interrupted,
}

/// What happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: ShutdownReason,
    pub frames_presented: u64,
    pub cycles_skipped: u64,
    /// Time spent in `Running`.
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("could not find the display opened by driver '{driver}' within {timeout:?}")]
    DiscoveryTimeout { driver: String, timeout: Duration },

    #[error("driver '{driver}' exited without opening a display")]
    DriverExited { driver: String },

    #[error("failed to start driver: {0:#}")]
    DriverSpawn(anyhow::Error),

    #[error("display driver sent an unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

impl SimError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Drives one window from one framebuffer bridge.
pub struct Simulator {
    config: Config,
    display: DisplayManager,
    driver_name: String,
    state: PresenterState,
}

impl Simulator {
    pub fn new(config: Config, display: DisplayManager, driver_name: &str) -> Self {
        Self {
            config,
            display,
            driver_name: driver_name.to_string(),
            state: PresenterState::AwaitingFirstFrame,
        }
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    fn transition(&mut self, next: PresenterState) {
        info!("Simulator: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs the loop to completion. The window is released on return.
    pub fn run(mut self, discovery: &BridgeDiscovery) -> Result<RunSummary, SimError> {
        let bridge = match self.await_bridge(discovery) {
            Ok(Some(bridge)) => bridge,
            Ok(None) => {
                self.transition(PresenterState::ShuttingDown);
                return Ok(RunSummary {
                    reason: ShutdownReason::WindowClosed,
                    frames_presented: 0,
                    cycles_skipped: 0,
                    elapsed: Duration::ZERO,
                });
            }
            Err(e) => {
                self.transition(PresenterState::ShuttingDown);
                return Err(e);
            }
        };

        self.transition(PresenterState::Running);
        match self.config.timing.run_timeout() {
            Some(limit) => println!(
                "Simulator started. Will auto-exit in {} seconds.",
                limit.as_secs()
            ),
            None => println!("Simulator started. Press Ctrl+C or close the window to exit."),
        }

        let result = self.present_frames(&bridge);
        self.transition(PresenterState::ShuttingDown);
        result
    }

    /// `AwaitingFirstFrame`: polls for the bridge while keeping the window
    /// responsive. `Ok(None)` means the user closed the window first.
    fn await_bridge(
        &mut self,
        discovery: &BridgeDiscovery,
    ) -> Result<Option<Arc<FramebufferBridge>>, SimError> {
        let timing = &self.config.timing;
        let timeout = timing.discovery_timeout();
        let interval = timing.discovery_poll_interval();
        let started = Instant::now();
        info!(
            "Simulator: Waiting up to {:?} for '{}' to open its display",
            timeout, self.driver_name
        );

        loop {
            if self.close_requested()? || signal::interrupt_requested() {
                info!("Simulator: Closed before the driver opened its display");
                return Ok(None);
            }

            let remaining = timeout.saturating_sub(started.elapsed());
            match discovery.poll(interval.min(remaining)) {
                Discovery::Found(bridge) => {
                    info!(
                        "Simulator: Found {}x{} framebuffer after {:?}",
                        bridge.dimensions().0,
                        bridge.dimensions().1,
                        started.elapsed()
                    );
                    return Ok(Some(bridge));
                }
                Discovery::HostDropped => {
                    return Err(SimError::DriverExited {
                        driver: self.driver_name.clone(),
                    });
                }
                Discovery::Pending => trace!("Simulator: Display not open yet"),
            }

            if started.elapsed() >= timeout {
                return Err(SimError::DiscoveryTimeout {
                    driver: self.driver_name.clone(),
                    timeout,
                });
            }
        }
    }

    /// `Running`: one render cycle per frame slot until asked to stop.
    fn present_frames(&mut self, bridge: &FramebufferBridge) -> Result<RunSummary, SimError> {
        let scale = self.config.display.scale;
        let expected = self.config.display.physical_size();
        let run_timeout = self.config.timing.run_timeout();

        let mut clock = FrameClock::with_frame_duration(self.config.timing.frame_duration());
        let mut frame = Some(DisplayFrame::new(
            self.display.width_px(),
            self.display.height_px(),
        ));
        let mut frames_presented = 0u64;
        let mut cycles_skipped = 0u64;
        let mut reported_bad_shape = false;
        let mut reported_failure = false;
        let mut reported_close = false;
        let started = Instant::now();

        let reason = loop {
            if self.close_requested()? {
                break ShutdownReason::WindowClosed;
            }
            if signal::interrupt_requested() {
                break ShutdownReason::Interrupted;
            }
            if let Some(limit) = run_timeout {
                if started.elapsed() >= limit {
                    println!("Simulation timed out after {} seconds.", limit.as_secs());
                    break ShutdownReason::TimedOut;
                }
            }

            if bridge.is_closed() && !reported_close {
                info!("Simulator: Driver closed its display, keeping the last frame");
                reported_close = true;
            }

            let snapshot = bridge.read_snapshot();
            if snapshot.dimensions() != expected {
                cycles_skipped += 1;
                if !reported_bad_shape {
                    warn!(
                        "Simulator: Framebuffer is {:?}, expected {:?}; skipping frames until it matches",
                        snapshot.dimensions(),
                        expected
                    );
                    reported_bad_shape = true;
                }
                clock.tick();
                continue;
            }

            let mut buffer = frame.take().unwrap_or_else(|| {
                DisplayFrame::new(self.display.width_px(), self.display.height_px())
            });
            render::render_into(&snapshot, scale, &mut buffer);

            match self.display.handle_request(DriverRequest::Present(buffer)) {
                Ok(DriverResponse::PresentComplete(returned)) => {
                    frame = Some(returned);
                    frames_presented += 1;
                }
                Ok(other) => {
                    return Err(SimError::UnexpectedResponse(format!("{:?}", other)));
                }
                Err(DisplayError::PresentationFailed(returned, reason)) => {
                    // Recover the buffer even on error.
                    frame = Some(returned);
                    if reported_failure {
                        debug!("Presentation failed, buffer recovered: {}", reason);
                    } else {
                        warn!("Presentation failed, buffer recovered: {}", reason);
                        reported_failure = true;
                    }
                }
                Err(e) => {
                    error!("Simulator: Display driver failed: {}", e);
                    return Err(e.into());
                }
            }

            clock.tick();
        };

        let summary = RunSummary {
            reason,
            frames_presented,
            cycles_skipped,
            elapsed: started.elapsed(),
        };
        info!(
            "Simulator: Stopped ({:?}) after {:?}: {} frames presented, {} skipped, {} slow cycles, {} driver submissions",
            summary.reason,
            summary.elapsed,
            summary.frames_presented,
            summary.cycles_skipped,
            clock.overruns(),
            bridge.submissions()
        );
        Ok(summary)
    }

    fn close_requested(&mut self) -> Result<bool, SimError> {
        let events = self.display.poll_events()?;
        for event in &events {
            trace!("Simulator: Event {:?}", event);
        }
        Ok(events.contains(&DisplayEvent::CloseRequested))
    }
}

/// Hosts `task` on its own thread and presents its display until shutdown.
///
/// The driver thread is cancelled on the way out and joined if it stops
/// within the configured grace period.
pub fn run_simulation(
    config: &Config,
    task: Box<dyn DriverTask>,
    display: DisplayManager,
) -> Result<RunSummary, SimError> {
    let (host, discovery) = handshake(
        config.display.logical_width,
        config.display.logical_height,
    );
    let mut driver = DriverThread::spawn(task, host).map_err(SimError::DriverSpawn)?;

    let simulator = Simulator::new(config.clone(), display, driver.name());
    let result = simulator.run(&discovery);

    match driver.stop(config.timing.driver_shutdown_grace()) {
        Some(Ok(())) => debug!("Simulator: Driver '{}' stopped", driver.name()),
        Some(Err(e)) => warn!("Simulator: Driver '{}' ended with an error: {:#}", driver.name(), e),
        None => {}
    }
    drop(discovery);

    result
}
