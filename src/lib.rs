// src/lib.rs

//! Run framebuffer display programs against a window instead of hardware.
//!
//! A driver task draws RGB888 images in its own orientation and submits them
//! to a [`FramebufferBridge`](bridge::FramebufferBridge), which stores them the
//! way an RGB565 panel would. The presentation loop reads that packed buffer
//! back at a fixed rate, undoes the panel rotation, scales it up and shows it.

pub mod bridge;
pub mod color;
pub mod config;
pub mod display;
pub mod grid;
pub mod presenter;
pub mod signal;
pub mod task;

pub use bridge::{DisplaySink, FramebufferBridge, PackedFramebuffer, SourceImage};
pub use config::{Config, CONFIG};
pub use presenter::{run_simulation, RunSummary, ShutdownReason, SimError, Simulator};
pub use task::{DriverTask, ShutdownToken};
