//! A square bouncing off the edges of the panel.

use super::{fill_rect, run_frames};
use crate::bridge::DisplayHost;
use crate::task::{DriverTask, ShutdownToken};
use anyhow::Result;

const SIZE: i32 = 32;
const BACKGROUND: [u8; 3] = [16, 16, 48];
const BOX: [u8; 3] = [255, 160, 0];

pub struct BouncingBox {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

impl Default for BouncingBox {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            dx: 3,
            dy: 5,
        }
    }
}

impl BouncingBox {
    fn step(&mut self, width: i32, height: i32) {
        let max_x = (width - SIZE).max(0);
        let max_y = (height - SIZE).max(0);

        self.x += self.dx;
        if self.x <= 0 || self.x >= max_x {
            self.dx = -self.dx;
            self.x = self.x.clamp(0, max_x);
        }
        self.y += self.dy;
        if self.y <= 0 || self.y >= max_y {
            self.dy = -self.dy;
            self.y = self.y.clamp(0, max_y);
        }
    }
}

impl DriverTask for BouncingBox {
    fn name(&self) -> &'static str {
        "bouncing-box"
    }

    fn run(&mut self, host: DisplayHost, shutdown: ShutdownToken) -> Result<()> {
        run_frames(host, &shutdown, |image, _tick| {
            let (w, h) = image.dimensions();
            fill_rect(image, 0, 0, w, h, BACKGROUND);
            let (x, y) = (self.x as u32, self.y as u32);
            fill_rect(image, x, y, x + SIZE as u32, y + SIZE as u32, BOX);
            self.step(w as i32, h as i32);
        })
    }
}
