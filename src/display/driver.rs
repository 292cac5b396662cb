// src/display/driver.rs
//! DisplayDriver trait - minimal interface for platform-specific display primitives.
//!
//! ## Threading Model
//! - The driver lives on the thread that runs the presentation loop
//! - It never sees the framebuffer bridge, only finished `DisplayFrame`s
//!
//! ## Lifecycle
//! 1. `new()` - Pure initialization (connect to the display server)
//! 2. `handle_request(Init)` - Create the window
//! 3. Request/response loop - All operations via messages
//! 4. `Drop` - Releases window resources (no explicit shutdown message)

use crate::display::messages::{DisplayError, DriverRequest, DriverResponse};
use anyhow::Result;

/// Minimal platform-specific display driver interface.
pub trait DisplayDriver {
    /// Pure initialization only - no window creation.
    fn new() -> Result<Self>
    where
        Self: Sized;

    /// Handle a request from DisplayManager, returning a response.
    ///
    /// ## Request/Response Pairs
    /// - `Init(config)` → `InitComplete`
    /// - `PollEvents` → `Events`
    /// - `Present(frame)` → `PresentComplete(frame)`
    ///
    /// ## Error Handling
    /// When a `Present` request fails, the frame is returned via
    /// `DisplayError::PresentationFailed` so its buffer can be reused.
    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError>;
}
