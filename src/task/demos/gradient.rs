//! Scrolling hue gradient, one hue step per row.

use super::{hue_to_rgb, run_frames};
use crate::bridge::DisplayHost;
use crate::task::{DriverTask, ShutdownToken};
use anyhow::Result;

#[derive(Default)]
pub struct Gradient {
    offset: u32,
}

impl DriverTask for Gradient {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn run(&mut self, host: DisplayHost, shutdown: ShutdownToken) -> Result<()> {
        let offset = &mut self.offset;
        run_frames(host, &shutdown, |image, _tick| {
            let h = image.height().max(1);
            for (_, y, pixel) in image.enumerate_pixels_mut() {
                pixel.0 = hue_to_rgb(y * 360 / h + *offset);
            }
            *offset = (*offset + 3) % 360;
        })
    }
}
