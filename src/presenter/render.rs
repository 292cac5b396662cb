// src/presenter/render.rs
//! Turns a packed snapshot into a window-ready frame.
//!
//! decode (RGB565 → RGB888) → rotate 270° clockwise back to logical
//! orientation → nearest-neighbor upscale by an integer factor → BGRX bytes.

use crate::bridge::PackedFramebuffer;
use crate::color::decode_565_to_rgb888;
use crate::display::{DisplayFrame, BYTES_PER_PIXEL};
use crate::grid::Grid;

/// Undoes the bridge's quarter turn.
const RESTORE_TURNS: u32 = 3;

/// Decodes a snapshot into logical-orientation RGB888.
pub fn decode(snapshot: &PackedFramebuffer) -> Grid<[u8; 3]> {
    snapshot.grid().rotate_90(RESTORE_TURNS).map(|value| {
        let (r, g, b) = decode_565_to_rgb888(value);
        [r, g, b]
    })
}

/// Window size a snapshot renders to at `scale`.
pub fn output_size(snapshot: &PackedFramebuffer, scale: u32) -> (u32, u32) {
    // Logical width is the physical height.
    (snapshot.height() * scale, snapshot.width() * scale)
}

/// Renders `snapshot` into `frame`, reallocating it if the size is off.
pub fn render_into(snapshot: &PackedFramebuffer, scale: u32, frame: &mut DisplayFrame) {
    let scale = scale.max(1) as usize;
    let (out_w, out_h) = output_size(snapshot, scale as u32);
    if (frame.width_px, frame.height_px) != (out_w, out_h) {
        *frame = DisplayFrame::new(out_w, out_h);
    }

    let logical = decode(snapshot);
    let stride = frame.stride();

    for (y, row) in logical.rows().enumerate() {
        let first_line = y * scale * stride;
        let line = &mut frame.pixels[first_line..first_line + stride];
        for (x, [r, g, b]) in row.iter().enumerate() {
            let start = x * scale * BYTES_PER_PIXEL;
            for px in line[start..start + scale * BYTES_PER_PIXEL].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&[*b, *g, *r, 0]);
            }
        }
        // Remaining lines of this block repeat the first.
        for k in 1..scale {
            let dst = first_line + k * stride;
            frame.pixels.copy_within(first_line..first_line + stride, dst);
        }
    }
}

/// Convenience wrapper that allocates a new frame.
pub fn render(snapshot: &PackedFramebuffer, scale: u32) -> DisplayFrame {
    let (w, h) = output_size(snapshot, scale.max(1));
    let mut frame = DisplayFrame::new(w, h);
    render_into(snapshot, scale, &mut frame);
    frame
}
