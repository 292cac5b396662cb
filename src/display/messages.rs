// src/display/messages.rs
//! Message types for communication between DisplayManager and DisplayDriver.
//!
//! Frames move by ownership transfer: the presentation loop hands a
//! `DisplayFrame` to the driver in `Present` and gets it back in
//! `PresentComplete` (or inside `PresentationFailed`) for reuse.

use thiserror::Error;

/// Bytes per presented pixel (B, G, R, X).
pub const BYTES_PER_PIXEL: usize = 4;

/// Window parameters passed with `Init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub title: String,
}

/// Requests sent from DisplayManager to DisplayDriver.
#[derive(Debug)]
pub enum DriverRequest {
    /// Create the window. Driver responds with InitComplete.
    Init(DriverConfig),

    /// Request pending native events. Driver responds with Events.
    PollEvents,

    /// Show the frame. Driver responds with PresentComplete, returning the frame.
    Present(DisplayFrame),
}

/// Responses sent from DisplayDriver to DisplayManager.
#[derive(Debug)]
pub enum DriverResponse {
    /// Window created with the given size.
    InitComplete { width_px: u32, height_px: u32 },

    /// Native events that occurred since the last poll.
    Events(Vec<DisplayEvent>),

    /// Presentation complete, frame ownership returned for reuse.
    PresentComplete(DisplayFrame),
}

/// Platform-agnostic display events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// User asked to close the window, or the window was destroyed.
    CloseRequested,
}

/// A decoded, oriented and scaled frame ready to be shown.
///
/// Pixels are row-major, `BYTES_PER_PIXEL` bytes each, in B, G, R, X order
/// (the 24-bit TrueColor layout X servers expect on little-endian hosts).
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub pixels: Box<[u8]>,
    pub width_px: u32,
    pub height_px: u32,
}

impl DisplayFrame {
    /// An all-black frame.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        let size = width_px as usize * height_px as usize * BYTES_PER_PIXEL;
        Self {
            pixels: vec![0u8; size].into_boxed_slice(),
            width_px,
            height_px,
        }
    }

    pub fn stride(&self) -> usize {
        self.width_px as usize * BYTES_PER_PIXEL
    }

    /// `(r, g, b)` at the given position.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        let i = y as usize * self.stride() + x as usize * BYTES_PER_PIXEL;
        Some((self.pixels[i + 2], self.pixels[i + 1], self.pixels[i]))
    }
}

impl std::fmt::Debug for DisplayFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayFrame")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Errors returned by display drivers.
///
/// A failed `Present` hands the frame back so the presentation loop never
/// loses its buffer.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("presentation failed: {1}")]
    PresentationFailed(DisplayFrame, String),

    #[error(transparent)]
    Generic(#[from] anyhow::Error),
}
