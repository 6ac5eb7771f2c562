//! Face-region selection boundary.
//!
//! Detection itself is an external capability behind [`FaceDetector`]; this
//! module only defines what a detection looks like, how keypoints become a
//! sampling region, and the async hand-off in [`DetectionService`].

mod service;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::ascii::Region;
use crate::source::PixelBuffer;

pub use service::{DetectionService, DetectionState};

/// Landmark indices highlighted with glowing markers (eye corners, nose
/// bridge and tip, mouth corners, lips).
pub const KEY_LANDMARKS: [usize; 12] = [33, 133, 362, 263, 1, 4, 5, 6, 61, 291, 17, 0];

/// A named point in source-buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
}

impl Keypoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One detected face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    /// Bounding box in source-buffer coordinates
    pub bounds: Region,
    /// Optional landmark points, indexed by landmark id
    pub keypoints: Vec<Keypoint>,
}

impl FaceDetection {
    pub fn from_bounds(bounds: Region) -> Self {
        Self {
            bounds,
            keypoints: Vec::new(),
        }
    }

    /// Region to sample for this face.
    ///
    /// Uses padded keypoint bounds when landmarks are present, the detector
    /// box otherwise.
    pub fn sampling_region(&self, padding: i32, width: u32, height: u32) -> Region {
        bounds_from_keypoints(&self.keypoints, padding, width, height)
            .unwrap_or_else(|| self.bounds.clamp_to(width, height))
    }
}

/// What to draw when no face is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoFacePolicy {
    /// Map the whole frame
    #[default]
    WholeFrame,
    /// Draw no glyph layer at all
    Suppress,
}

impl NoFacePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            NoFacePolicy::WholeFrame => "whole-frame",
            NoFacePolicy::Suppress => "suppress",
        }
    }
}

/// Errors a detector can report. All of them are treated as "no faces".
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("face model not loaded")]
    ModelNotReady,
    #[error("face detection failed: {0}")]
    Failed(String),
    #[error("face detection timed out after {0:?}")]
    TimedOut(Duration),
    #[error("face detection task aborted")]
    Aborted,
}

/// An asynchronous face detector.
pub trait FaceDetector: Send + Sync + 'static {
    /// Detect faces in a frame. Zero faces is a normal result.
    fn detect(
        &self,
        frame: PixelBuffer,
    ) -> impl Future<Output = Result<Vec<FaceDetection>, DetectError>> + Send;
}

/// Detector that reports a fixed set of boxes for every frame.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    faces: Vec<FaceDetection>,
}

impl StaticDetector {
    pub fn new(faces: Vec<FaceDetection>) -> Self {
        Self { faces }
    }

    pub fn from_regions(regions: &[Region]) -> Self {
        Self::new(regions.iter().copied().map(FaceDetection::from_bounds).collect())
    }
}

impl FaceDetector for StaticDetector {
    async fn detect(&self, _frame: PixelBuffer) -> Result<Vec<FaceDetection>, DetectError> {
        Ok(self.faces.clone())
    }
}

/// Padded bounding box of a keypoint set, clamped to the frame.
///
/// Returns `None` for an empty keypoint set or a box that falls entirely
/// outside the frame.
pub fn bounds_from_keypoints(
    keypoints: &[Keypoint],
    padding: i32,
    width: u32,
    height: u32,
) -> Option<Region> {
    if keypoints.is_empty() {
        return None;
    }

    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for kp in keypoints {
        min_x = min_x.min(kp.x);
        min_y = min_y.min(kp.y);
        max_x = max_x.max(kp.x);
        max_y = max_y.max(kp.y);
    }

    let x0 = min_x.floor() as i32;
    let y0 = min_y.floor() as i32;
    let x1 = max_x.ceil() as i32;
    let y1 = max_y.ceil() as i32;

    let region = Region::new(x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
        .padded(padding)
        .clamp_to(width, height);
    (!region.is_empty()).then_some(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_keypoints_padded_and_clamped() {
        let kps = [Keypoint::new(10.0, 20.0), Keypoint::new(50.0, 60.0)];
        let r = bounds_from_keypoints(&kps, 5, 100, 100).unwrap();
        assert_eq!(r, Region::new(5, 15, 50, 50));

        let r = bounds_from_keypoints(&kps, 80, 100, 100).unwrap();
        assert_eq!(r, Region::new(0, 0, 100, 100));
    }

    #[test]
    fn test_bounds_from_keypoints_empty() {
        assert!(bounds_from_keypoints(&[], 10, 100, 100).is_none());
    }

    #[test]
    fn test_bounds_from_keypoints_outside_frame() {
        let kps = [Keypoint::new(500.0, 500.0)];
        assert!(bounds_from_keypoints(&kps, 0, 100, 100).is_none());
    }

    #[test]
    fn test_sampling_region_prefers_keypoints() {
        let face = FaceDetection {
            bounds: Region::new(0, 0, 10, 10),
            keypoints: vec![Keypoint::new(40.0, 40.0), Keypoint::new(60.0, 60.0)],
        };
        assert_eq!(face.sampling_region(0, 100, 100), Region::new(40, 40, 20, 20));
    }

    #[test]
    fn test_sampling_region_falls_back_to_bounds() {
        let face = FaceDetection::from_bounds(Region::new(-10, 90, 30, 30));
        assert_eq!(face.sampling_region(0, 100, 100), Region::new(0, 90, 20, 10));
    }

    #[tokio::test]
    async fn test_static_detector_returns_configured_faces() {
        let det = StaticDetector::from_regions(&[Region::new(1, 2, 3, 4)]);
        let faces = det.detect(PixelBuffer::new(8, 8)).await.unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].bounds, Region::new(1, 2, 3, 4));
    }
}
