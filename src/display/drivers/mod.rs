// src/display/drivers/mod.rs
//! Platform-specific display driver implementations.

pub mod headless;

#[cfg(feature = "x11")]
pub mod x11;

pub use headless::{FrameCapture, HeadlessDisplayDriver};

#[cfg(feature = "x11")]
pub use self::x11::X11DisplayDriver;
