// src/bridge/mod.rs

//! Framebuffer bridge between a driver task and the presentation loop.
//!
//! - `FramebufferBridge`: owns the packed RGB565 state, encodes submissions
//! - `DisplaySink`: the capability handed to driver tasks
//! - `handshake`: how the presentation loop learns about the bridge
//!
//! ## Threading Model
//! - `submit` runs on the driver task's thread
//! - `read_snapshot` runs on the presentation thread
//! - Each submission builds a complete new grid off-lock, then swaps an `Arc`
//!   under a mutex. Readers clone the `Arc`, so they always see one whole frame
//!   and never wait on encoding work.

pub mod handshake;

pub use handshake::{handshake, BridgeDiscovery, DisplayHost, Discovery};

use crate::color::encode_rgb888_to_565;
use crate::grid::Grid;
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Image produced by a driver task, in logical orientation.
pub type SourceImage = image::RgbImage;

/// Errors raised by the bridge and its handshake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The rotated image does not have the framebuffer's physical size.
    #[error(
        "submitted image is {actual:?} (width, height) after rotation but the framebuffer is {expected:?}"
    )]
    GeometryMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("framebuffer dimensions must be non-zero, got {width}x{height}")]
    EmptyGeometry { width: u32, height: u32 },

    /// The driver tried to open a second display.
    #[error("a framebuffer bridge has already been opened for this display")]
    AlreadyOpen,

    /// The simulator stopped listening before the driver opened its display.
    #[error("the simulator is no longer accepting a display")]
    ShutDown,
}

/// Capability a driver task draws through.
///
/// Implemented by [`FramebufferBridge`]; driver tasks only ever see this
/// trait, never the window.
pub trait DisplaySink: Send + Sync {
    /// Hands a finished logical-orientation image to the display.
    ///
    /// Never waits on the presentation loop. The image is fully consumed
    /// before this returns.
    fn submit(&self, image: &SourceImage) -> Result<(), BridgeError>;

    /// Signals that the driver is done with the display.
    fn close(&self);
}

/// Packed RGB565 pixels in physical orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFramebuffer {
    grid: Grid<u16>,
}

impl PackedFramebuffer {
    /// An all-black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::filled(width as usize, height as usize, 0),
        }
    }

    /// Encodes a logical-orientation image and rotates it a quarter turn
    /// clockwise into physical orientation.
    pub fn encode(image: &SourceImage) -> Self {
        let logical = Grid::from_fn(image.width() as usize, image.height() as usize, |x, y| {
            let [r, g, b] = image.get_pixel(x as u32, y as u32).0;
            encode_rgb888_to_565(r, g, b)
        });
        Self {
            grid: logical.rotate_90(1),
        }
    }

    pub fn from_grid(grid: Grid<u16>) -> Self {
        Self { grid }
    }

    pub fn width(&self) -> u32 {
        self.grid.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.grid.height() as u32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        self.grid.get(x as usize, y as usize)
    }

    /// Row-major packed values.
    pub fn pixels(&self) -> &[u16] {
        self.grid.cells()
    }

    pub fn grid(&self) -> &Grid<u16> {
        &self.grid
    }
}

/// In-memory stand-in for the device framebuffer.
pub struct FramebufferBridge {
    width: u32,
    height: u32,
    current: Mutex<Arc<PackedFramebuffer>>,
    submissions: AtomicU64,
    closed: AtomicBool,
}

impl FramebufferBridge {
    /// Allocates an all-black framebuffer with the given physical size.
    pub fn new(width: u32, height: u32) -> Result<Self, BridgeError> {
        if width == 0 || height == 0 {
            return Err(BridgeError::EmptyGeometry { width, height });
        }
        info!("FramebufferBridge: Allocated {}x{} RGB565 framebuffer", width, height);
        Ok(Self {
            width,
            height,
            current: Mutex::new(Arc::new(PackedFramebuffer::new(width, height))),
            submissions: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }

    /// Physical `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Encodes `image` and publishes it as the current frame.
    pub fn submit(&self, image: &SourceImage) -> Result<(), BridgeError> {
        // A quarter turn swaps the axes.
        let rotated = (image.height(), image.width());
        if rotated != (self.width, self.height) {
            return Err(BridgeError::GeometryMismatch {
                expected: (self.width, self.height),
                actual: rotated,
            });
        }

        let frame = Arc::new(PackedFramebuffer::encode(image));
        self.publish(frame);
        Ok(())
    }

    /// Swaps in an already-encoded frame.
    fn publish(&self, frame: Arc<PackedFramebuffer>) {
        let previous = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, frame)
        };
        // The old frame is freed outside the lock unless a reader still holds it.
        drop(previous);

        let n = self.submissions.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("FramebufferBridge: Published frame #{}", n);
    }

    /// Immutable view of the most recently published frame.
    pub fn read_snapshot(&self) -> Arc<PackedFramebuffer> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of frames submitted so far.
    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl DisplaySink for FramebufferBridge {
    fn submit(&self, image: &SourceImage) -> Result<(), BridgeError> {
        FramebufferBridge::submit(self, image)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(
                "FramebufferBridge: Closed by driver after {} frames",
                self.submissions()
            );
        }
    }
}

impl std::fmt::Debug for FramebufferBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramebufferBridge")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("submissions", &self.submissions())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests;
