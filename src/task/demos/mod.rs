// src/task/demos/mod.rs
//! Built-in driver tasks.
//!
//! These stand in for user display programs: each draws in logical
//! orientation with the `image` crate and submits through a `DisplaySink`.

mod bouncing_box;
mod color_bars;
mod gradient;
mod idle;

pub use bouncing_box::BouncingBox;
pub use color_bars::ColorBars;
pub use gradient::Gradient;
pub use idle::Idle;

use super::{DriverTask, ShutdownToken};
use crate::bridge::{DisplayHost, DisplaySink, SourceImage};
use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Names accepted by [`lookup`].
pub const DRIVER_NAMES: &[&str] = &["color-bars", "gradient", "bouncing-box", "idle"];

/// Frame rate the demos draw at. Deliberately below the presentation rate.
const DEMO_FPS: u64 = 30;

/// Finds a built-in driver task by name.
pub fn lookup(name: &str) -> Option<Box<dyn DriverTask>> {
    match name {
        "color-bars" => Some(Box::new(ColorBars)),
        "gradient" => Some(Box::new(Gradient::default())),
        "bouncing-box" => Some(Box::new(BouncingBox::default())),
        "idle" => Some(Box::new(Idle)),
        _ => None,
    }
}

/// Opens the display and submits one drawn frame per tick until cancelled.
fn run_frames(
    mut host: DisplayHost,
    shutdown: &ShutdownToken,
    mut draw: impl FnMut(&mut SourceImage, u64),
) -> Result<()> {
    let (width, height) = host.logical_size();
    let display: Arc<dyn DisplaySink> = host
        .open_default()
        .context("Failed to open the simulated display")?;

    let mut image = SourceImage::new(width, height);
    let interval = Duration::from_millis(1000 / DEMO_FPS);
    let mut tick = 0u64;

    while !shutdown.is_cancelled() {
        draw(&mut image, tick);
        display.submit(&image)?;
        tick += 1;
        if shutdown.sleep(interval) {
            break;
        }
    }

    debug!("Demo: Submitted {} frames", tick);
    display.close();
    Ok(())
}

/// Fills the rectangle `[x0, x1) × [y0, y1)`, clipped to the image.
fn fill_rect(image: &mut SourceImage, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, image::Rgb(color));
        }
    }
}

/// Fully saturated color at `hue` degrees.
fn hue_to_rgb(hue: u32) -> [u8; 3] {
    let h = hue % 360;
    let x = ((h % 60) * 255 / 60) as u8;
    match h / 60 {
        0 => [255, x, 0],
        1 => [255 - x, 255, 0],
        2 => [0, 255, x],
        3 => [0, 255 - x, 255],
        4 => [x, 0, 255],
        _ => [255, 0, 255 - x],
    }
}
