//! Brightness of a single RGB sample.

/// Unweighted mean of the three colour channels.
///
/// The formula is: B = (R + G + B) / 3
///
/// This is deliberately not a perceptual luma (no BT.601 weights): every
/// glyph ramp and colour gradient in the crate is tuned against the plain
/// mean, and pure red, green and blue all land on the same glyph.
#[inline]
pub fn mean_brightness(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Halftone darkness from the red channel alone: `255 - R`.
///
/// Dark red means a large dot; the other channels are ignored.
#[inline]
pub fn red_darkness(r: u8) -> u8 {
    255 - r
}
