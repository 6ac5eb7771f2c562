//! RGBA pixel buffer handed from a frame source to the mapper.

use std::time::Instant;

use super::SourceError;
use crate::ascii::{Region, Rgba};

/// A rectangular RGBA8 image, row-major, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// Raw pixel data (R, G, B, A)
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// When this buffer was produced
    pub timestamp: Instant,
}

impl PixelBuffer {
    /// Bytes per pixel (always 4).
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Opaque black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::rgb(0, 0, 0))
    }

    /// Buffer filled with a single colour.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * Self::BYTES_PER_PIXEL);
        for _ in 0..pixels {
            data.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// Wrap existing RGBA data.
    ///
    /// # Errors
    /// Returns [`SourceError::BufferSize`] when `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, SourceError> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(SourceError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        })
    }

    /// Region covering the whole buffer.
    pub fn bounds(&self) -> Region {
        Region::full(self.width, self.height)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL)
    }

    /// Read one pixel; `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        let px = self.data.get(i..i + Self::BYTES_PER_PIXEL)?;
        Some(Rgba::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Write one pixel; out-of-range writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y)
            && let Some(px) = self.data.get_mut(i..i + Self::BYTES_PER_PIXEL)
        {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// True when the buffer has pixels to sample.
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0 && !self.data.is_empty()
    }
}
