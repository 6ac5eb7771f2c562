//! Frame sources that produce pixel buffers for the mapper.
//!
//! A source is polled once per frame. `None` means "no data ready yet";
//! the compositor skips the glyph layer for that frame and shows a loading
//! indicator instead.

mod buffer;
mod image_file;
mod procedural;

use std::path::PathBuf;

use thiserror::Error;

use crate::clock::FrameClock;

pub use buffer::PixelBuffer;
pub use image_file::ImageSource;
pub use procedural::{ProceduralFace, SimulatedFace};

/// Errors that can occur while creating a frame source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to decode image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

/// Something that can hand the mapper a pixel buffer each frame.
pub trait FrameSource {
    /// Poll for the current frame.
    ///
    /// Returns `None` while the source has nothing to sample yet.
    fn poll_frame(&mut self, clock: &FrameClock) -> Option<&PixelBuffer>;

    /// Short name for the status line.
    fn name(&self) -> &str;
}

/// A source that always returns the same buffer.
#[derive(Debug, Clone)]
pub struct StaticSource {
    buffer: PixelBuffer,
}

impl StaticSource {
    pub fn new(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }
}

impl FrameSource for StaticSource {
    fn poll_frame(&mut self, _clock: &FrameClock) -> Option<&PixelBuffer> {
        self.buffer.is_ready().then_some(&self.buffer)
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_ready() {
        let mut src = StaticSource::new(PixelBuffer::new(2, 2));
        assert!(src.poll_frame(&FrameClock::new()).is_some());
    }

    #[test]
    fn test_static_source_empty_not_ready() {
        let mut src = StaticSource::new(PixelBuffer::new(0, 0));
        assert!(src.poll_frame(&FrameClock::new()).is_none());
    }
}
