//! Classic eight-bar test pattern with a moving marker line.

use super::{fill_rect, run_frames};
use crate::bridge::DisplayHost;
use crate::task::{DriverTask, ShutdownToken};
use anyhow::Result;

const BARS: [[u8; 3]; 8] = [
    [255, 255, 255],
    [255, 255, 0],
    [0, 255, 255],
    [0, 255, 0],
    [255, 0, 255],
    [255, 0, 0],
    [0, 0, 255],
    [0, 0, 0],
];

pub struct ColorBars;

impl DriverTask for ColorBars {
    fn name(&self) -> &'static str {
        "color-bars"
    }

    fn run(&mut self, host: DisplayHost, shutdown: ShutdownToken) -> Result<()> {
        run_frames(host, &shutdown, |image, tick| {
            let (w, h) = image.dimensions();
            for (i, color) in BARS.iter().enumerate() {
                let x0 = w * i as u32 / BARS.len() as u32;
                let x1 = w * (i as u32 + 1) / BARS.len() as u32;
                fill_rect(image, x0, 0, x1, h, *color);
            }
            let marker = (tick % h as u64) as u32;
            fill_rect(image, 0, marker, w, marker + 2, [128, 128, 128]);
        })
    }
}
