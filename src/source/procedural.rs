//! Procedurally generated "simulated face" frames.
//!
//! Draws a bright oval with darker eyes, a bright nose ridge and a dark
//! mouth curve, animated with slow sine waves and grain, so the whole
//! pipeline can run without any camera.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{FrameSource, PixelBuffer};
use crate::ascii::{Region, Rgba};
use crate::clock::FrameClock;
use crate::face::{FaceDetection, Keypoint};

/// Size of a full face-mesh landmark set.
pub const LANDMARK_COUNT: usize = 468;

/// Geometry of the simulated face, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedFace {
    pub radius: f32,
    pub eye_offset_x: f32,
    pub eye_offset_y: f32,
    pub eye_radius: f32,
    pub mouth_offset_y: f32,
    pub mouth_half_width: f32,
}

impl Default for SimulatedFace {
    fn default() -> Self {
        Self {
            radius: 150.0,
            eye_offset_x: 60.0,
            eye_offset_y: 30.0,
            eye_radius: 20.0,
            mouth_offset_y: 60.0,
            mouth_half_width: 80.0,
        }
    }
}

/// Animated procedural frame source.
pub struct ProceduralFace {
    buffer: PixelBuffer,
    face: SimulatedFace,
    rng: StdRng,
    /// Regenerate every N frames
    regen_every: u64,
    /// Amplitude of the per-pixel grain
    noise: f32,
    last_generated: Option<u64>,
}

impl ProceduralFace {
    /// Create a source with a fixed seed for reproducible grain.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            face: SimulatedFace::default(),
            rng: StdRng::seed_from_u64(seed),
            regen_every: 2,
            noise: 10.0,
            last_generated: None,
        }
    }

    pub fn with_face(mut self, face: SimulatedFace) -> Self {
        self.face = face;
        self
    }

    /// Grain amplitude in brightness units (0 disables grain).
    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise.max(0.0);
        self
    }

    pub fn with_regen_every(mut self, frames: u64) -> Self {
        self.regen_every = frames.max(1);
        self
    }

    /// Bounding box of the face oval, useful as a stand-in detection.
    pub fn face_region(&self) -> Region {
        let cx = self.buffer.width as f32 / 2.0;
        let cy = self.buffer.height as f32 / 2.0;
        let r = self.face.radius;
        Region::new(
            (cx - r).floor() as i32,
            (cy - r).floor() as i32,
            (2.0 * r).ceil() as i32,
            (2.0 * r).ceil() as i32,
        )
    }

    /// Detection matching the drawn face, with a full landmark set.
    ///
    /// Eye corners, nose, lips and mouth corners sit on the drawn features;
    /// the remaining landmarks trace the face outline.
    pub fn face_detection(&self) -> FaceDetection {
        let cx = self.buffer.width as f32 / 2.0;
        let cy = self.buffer.height as f32 / 2.0;
        let f = &self.face;

        let mut keypoints: Vec<Keypoint> = (0..LANDMARK_COUNT)
            .map(|i| {
                let angle = i as f32 / LANDMARK_COUNT as f32 * std::f32::consts::TAU;
                Keypoint::new(cx + angle.cos() * f.radius * 0.95, cy + angle.sin() * f.radius * 0.95)
            })
            .collect();

        let eye_y = cy - f.eye_offset_y;
        let mouth_y = cy + f.mouth_offset_y + 30.0;
        let features = [
            (33, cx - f.eye_offset_x - f.eye_radius, eye_y),
            (133, cx - f.eye_offset_x + f.eye_radius, eye_y),
            (362, cx + f.eye_offset_x - f.eye_radius, eye_y),
            (263, cx + f.eye_offset_x + f.eye_radius, eye_y),
            (6, cx, eye_y + 20.0),
            (5, cx, cy),
            (4, cx, cy + 20.0),
            (1, cx, cy + 35.0),
            (61, cx - f.mouth_half_width, cy + f.mouth_offset_y),
            (291, cx + f.mouth_half_width, cy + f.mouth_offset_y),
            (0, cx, mouth_y - 3.0),
            (17, cx, mouth_y + 3.0),
        ];
        for (index, x, y) in features {
            keypoints[index] = Keypoint::new(x, y);
        }

        FaceDetection {
            bounds: self.face_region(),
            keypoints,
        }
    }

    /// Brightness of the face pattern at a pixel, before grain.
    fn pattern(&self, x: f32, y: f32, frame: f32) -> f32 {
        let cx = self.buffer.width as f32 / 2.0;
        let cy = self.buffer.height as f32 / 2.0;
        let f = &self.face;

        let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        if dist >= f.radius {
            return 0.0;
        }

        // Oval falls off from 200 in the centre to 100 at the rim
        let mut b = 200.0 - 100.0 * dist / f.radius;

        let eye_y = cy - f.eye_offset_y;
        let left = ((x - (cx - f.eye_offset_x)).powi(2) + (y - eye_y).powi(2)).sqrt();
        let right = ((x - (cx + f.eye_offset_x)).powi(2) + (y - eye_y).powi(2)).sqrt();
        if left < f.eye_radius || right < f.eye_radius {
            b = 50.0;
        }

        if (x - cx).abs() < 5.0 && y > eye_y + 20.0 && y < cy + 40.0 {
            b = (b + 50.0).min(255.0);
        }

        let mouth_y = cy + f.mouth_offset_y;
        let t = (x - (cx - f.mouth_half_width)) / (2.0 * f.mouth_half_width);
        let curve = 30.0 * (t * std::f32::consts::PI).sin();
        if (y - (mouth_y + curve)).abs() < 3.0 && (x - cx).abs() < f.mouth_half_width {
            b = 70.0;
        }

        b + (frame * 0.05 + x * 0.02).sin() * 10.0 + (frame * 0.03 + y * 0.02).cos() * 10.0
    }

    fn generate(&mut self, frame: u64) {
        let t = frame as f32;
        for y in 0..self.buffer.height {
            for x in 0..self.buffer.width {
                let mut b = self.pattern(x as f32, y as f32, t);
                if self.noise > 0.0 {
                    b += self.rng.gen_range(-self.noise..self.noise);
                }
                let v = b.clamp(0.0, 255.0) as u8;
                self.buffer.set_pixel(x, y, Rgba::rgb(v, v, v));
            }
        }
        self.buffer.timestamp = std::time::Instant::now();
        self.last_generated = Some(frame);
    }
}

impl FrameSource for ProceduralFace {
    fn poll_frame(&mut self, clock: &FrameClock) -> Option<&PixelBuffer> {
        if !self.buffer.is_ready() {
            return None;
        }
        let due = match self.last_generated {
            None => true,
            Some(last) => clock.frame.saturating_sub(last) >= self.regen_every,
        };
        if due {
            self.generate(clock.frame);
        }
        Some(&self.buffer)
    }

    fn name(&self) -> &str {
        "procedural"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::mean_brightness;

    fn brightness_at(buf: &PixelBuffer, x: u32, y: u32) -> u8 {
        let p = buf.pixel(x, y).unwrap();
        mean_brightness(p.r, p.g, p.b)
    }

    #[test]
    fn test_face_brighter_than_background() {
        let mut src = ProceduralFace::new(640, 480, 7).with_noise(0.0);
        let buf = src.poll_frame(&FrameClock::new()).unwrap();
        // Cheek vs. corner
        assert!(brightness_at(buf, 380, 260) > 120);
        assert!(brightness_at(buf, 5, 5) < 30);
    }

    #[test]
    fn test_eyes_are_dark() {
        let mut src = ProceduralFace::new(640, 480, 7).with_noise(0.0);
        let buf = src.poll_frame(&FrameClock::new()).unwrap();
        assert!(brightness_at(buf, 260, 210) < 80);
        assert!(brightness_at(buf, 380, 210) < 80);
    }

    #[test]
    fn test_same_seed_same_frame() {
        let clock = FrameClock::new();
        let mut a = ProceduralFace::new(64, 48, 42);
        let mut b = ProceduralFace::new(64, 48, 42);
        assert_eq!(
            a.poll_frame(&clock).unwrap().data,
            b.poll_frame(&clock).unwrap().data
        );
    }

    #[test]
    fn test_regenerates_on_schedule() {
        let mut src = ProceduralFace::new(32, 32, 1).with_regen_every(2);
        let mut clock = FrameClock::new();
        let first = src.poll_frame(&clock).unwrap().data.clone();
        clock.tick();
        let second = src.poll_frame(&clock).unwrap().data.clone();
        assert_eq!(first, second);
        clock.tick();
        let third = src.poll_frame(&clock).unwrap().data.clone();
        assert_ne!(first, third);
    }

    #[test]
    fn test_face_region_centered() {
        let src = ProceduralFace::new(640, 480, 0);
        assert_eq!(src.face_region(), Region::new(170, 90, 300, 300));
    }

    #[test]
    fn test_face_detection_landmarks() {
        use crate::face::KEY_LANDMARKS;

        let src = ProceduralFace::new(640, 480, 0);
        let face = src.face_detection();
        assert_eq!(face.keypoints.len(), LANDMARK_COUNT);
        for &i in &KEY_LANDMARKS {
            let kp = face.keypoints[i];
            assert!(kp.x > 170.0 && kp.x < 470.0, "landmark {} at x {}", i, kp.x);
        }
        // Outline keeps the sampling region on the face oval
        let region = face.sampling_region(0, 640, 480);
        assert!(region.width <= 300 && region.width >= 280);
    }

    #[test]
    fn test_zero_size_not_ready() {
        let mut src = ProceduralFace::new(0, 0, 0);
        assert!(src.poll_frame(&FrameClock::new()).is_none());
    }
}
