// src/display/mod.rs
//! Message-based display system with Strategy Pattern.
//!
//! - DisplayDriver: Platform-specific primitives (X11, headless)
//! - DisplayManager: Common logic and state management
//! - Messages: Request/Response protocol for communication

pub mod driver;
pub mod drivers;
pub mod manager;
pub mod messages;

pub use driver::DisplayDriver;
pub use drivers::{FrameCapture, HeadlessDisplayDriver};
pub use manager::{DisplayBackend, DisplayManager};
pub use messages::{
    DisplayError, DisplayEvent, DisplayFrame, DriverConfig, DriverRequest, DriverResponse,
    BYTES_PER_PIXEL,
};

#[cfg(feature = "x11")]
pub use drivers::X11DisplayDriver;
