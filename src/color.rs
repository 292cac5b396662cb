// src/color.rs

//! RGB565 codec.
//!
//! The device framebuffer stores one color per 16-bit cell: 5 bits red,
//! 6 bits green, 5 bits blue, most significant bit first. Encoding truncates
//! the low bits of each 8-bit channel; decoding shifts them back in as zeros.
//! The round trip is deliberately lossy and mirrors the panel's color depth.

/// Bits kept per channel.
pub const RED_BITS: u32 = 5;
pub const GREEN_BITS: u32 = 6;
pub const BLUE_BITS: u32 = 5;

/// Low bits of an 8-bit channel that do not survive a round trip.
pub const RED_LOSS_MASK: u8 = (1 << (8 - RED_BITS)) - 1; // 0b111
pub const GREEN_LOSS_MASK: u8 = (1 << (8 - GREEN_BITS)) - 1; // 0b11
pub const BLUE_LOSS_MASK: u8 = (1 << (8 - BLUE_BITS)) - 1; // 0b111

pub const BLACK_565: u16 = 0x0000;
pub const WHITE_565: u16 = 0xFFFF;

/// Packs an 8-bit-per-channel color into RGB565.
///
/// Red and blue lose their low 3 bits, green its low 2 bits. No rounding, no
/// dithering.
#[inline]
pub fn encode_rgb888_to_565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r >> (8 - RED_BITS)) as u16;
    let g6 = (g >> (8 - GREEN_BITS)) as u16;
    let b5 = (b >> (8 - BLUE_BITS)) as u16;
    (r5 << 11) | (g6 << 5) | b5
}

/// Unpacks an RGB565 value into 8-bit channels.
///
/// This is not an inverse of [`encode_rgb888_to_565`]: the low bits of each
/// channel always come back as zero.
#[inline]
pub fn decode_565_to_rgb888(value: u16) -> (u8, u8, u8) {
    let r5 = ((value >> 11) & 0x1F) as u8;
    let g6 = ((value >> 5) & 0x3F) as u8;
    let b5 = (value & 0x1F) as u8;
    (r5 << 3, g6 << 2, b5 << 3)
}

/// What a channel triple looks like after one encode/decode cycle.
#[inline]
pub fn quantize(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    (r & !RED_LOSS_MASK, g & !GREEN_LOSS_MASK, b & !BLUE_LOSS_MASK)
}
