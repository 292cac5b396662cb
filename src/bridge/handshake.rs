// src/bridge/handshake.rs

//! One-shot registration channel between a driver task and the simulator.
//!
//! The driver task receives a [`DisplayHost`]; opening a display through it
//! constructs the [`FramebufferBridge`] and publishes it immediately. The
//! presentation loop holds the matching [`BridgeDiscovery`] and polls it with
//! a bounded wait until the bridge shows up.

use super::{BridgeError, FramebufferBridge};
use log::{debug, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::time::Duration;

/// Creates a connected host/discovery pair for a display of the given logical size.
pub fn handshake(logical_width: u32, logical_height: u32) -> (DisplayHost, BridgeDiscovery) {
    // Capacity 1 and a single send: publishing never blocks.
    let (tx, rx) = mpsc::sync_channel(1);
    (
        DisplayHost {
            logical_width,
            logical_height,
            publisher: Some(tx),
        },
        BridgeDiscovery { rx },
    )
}

/// Driver-side end of the handshake.
#[derive(Debug)]
pub struct DisplayHost {
    logical_width: u32,
    logical_height: u32,
    publisher: Option<SyncSender<Arc<FramebufferBridge>>>,
}

impl DisplayHost {
    /// Size the driver should draw at, `(width, height)`.
    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    /// Size the framebuffer is addressed at: the logical size transposed.
    pub fn physical_size(&self) -> (u32, u32) {
        (self.logical_height, self.logical_width)
    }

    /// Constructs the bridge at the given physical size and publishes it.
    ///
    /// Only one display may be opened per host.
    pub fn open(&mut self, width: u32, height: u32) -> Result<Arc<FramebufferBridge>, BridgeError> {
        if self.publisher.is_none() {
            return Err(BridgeError::AlreadyOpen);
        }
        let bridge = Arc::new(FramebufferBridge::new(width, height)?);
        let publisher = self.publisher.take().ok_or(BridgeError::AlreadyOpen)?;

        publisher
            .send(Arc::clone(&bridge))
            .map_err(|_| BridgeError::ShutDown)?;
        info!("DisplayHost: Published {}x{} framebuffer", width, height);
        Ok(bridge)
    }

    /// Opens the display at [`physical_size`](Self::physical_size).
    pub fn open_default(&mut self) -> Result<Arc<FramebufferBridge>, BridgeError> {
        let (w, h) = self.physical_size();
        self.open(w, h)
    }
}

/// Outcome of one discovery poll.
#[derive(Debug)]
pub enum Discovery {
    Found(Arc<FramebufferBridge>),
    /// Nothing published within the wait.
    Pending,
    /// The host was dropped without ever opening a display.
    HostDropped,
}

/// Simulator-side end of the handshake.
#[derive(Debug)]
pub struct BridgeDiscovery {
    rx: Receiver<Arc<FramebufferBridge>>,
}

impl BridgeDiscovery {
    /// Waits up to `wait` for the bridge to be published.
    pub fn poll(&self, wait: Duration) -> Discovery {
        match self.rx.recv_timeout(wait) {
            Ok(bridge) => {
                debug!("BridgeDiscovery: Found {:?}", bridge);
                Discovery::Found(bridge)
            }
            Err(RecvTimeoutError::Timeout) => Discovery::Pending,
            Err(RecvTimeoutError::Disconnected) => Discovery::HostDropped,
        }
    }
}
