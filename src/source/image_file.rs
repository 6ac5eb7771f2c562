//! Static image file source.

use std::path::{Path, PathBuf};

use super::{FrameSource, PixelBuffer, SourceError};
use crate::clock::FrameClock;

/// Frames from a still image on disk, decoded once.
#[derive(Debug, Clone)]
pub struct ImageSource {
    path: PathBuf,
    buffer: PixelBuffer,
}

impl ImageSource {
    /// Decode an image file into RGBA.
    ///
    /// Images larger than `max_width` x `max_height` are downscaled,
    /// preserving aspect ratio.
    pub fn open(path: &Path, max_width: u32, max_height: u32) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let mut img = image::open(path).map_err(|e| SourceError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;

        if img.width() > max_width || img.height() > max_height {
            img = img.thumbnail(max_width.max(1), max_height.max(1));
        }

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let buffer = PixelBuffer::from_rgba(rgba.into_raw(), width, height)?;

        log::info!(
            "Loaded image {} ({}x{})",
            path.display(),
            buffer.width,
            buffer.height
        );

        Ok(Self {
            path: path.to_path_buf(),
            buffer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageSource {
    fn poll_frame(&mut self, _clock: &FrameClock) -> Option<&PixelBuffer> {
        self.buffer.is_ready().then_some(&self.buffer)
    }

    fn name(&self) -> &str {
        "image"
    }
}
