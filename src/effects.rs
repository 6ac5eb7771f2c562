//! Post effects applied on top of the mapped glyphs.
//!
//! Glyph effects run on the draw commands before they reach the canvas
//! (wave offset, glitch jitter, character flicker, motion boost, keypoint
//! markers). Screen effects run on the painted canvas afterwards (scanline
//! sweep, glitch bars, vignette, border).
//!
//! All randomness comes from the caller's RNG so a seeded run is
//! reproducible frame for frame.

use rand::Rng;

use crate::ascii::{lerp_color, CoordinateMap, DrawCommand, GlyphRamp, Pass, Rgba, AMBER, ORANGE};
use crate::clock::FrameClock;
use crate::face::{FaceDetection, KEY_LANDMARKS};
use crate::terminal::CellCanvas;

/// Named bundle of effect settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectPreset {
    /// Only the mapped glyphs and their glow
    None,
    /// Wave, glitch, flicker, scanline, vignette and border
    #[default]
    Cyberpunk,
    /// Gentle wave and vignette, no glitches
    Calm,
}

impl EffectPreset {
    /// Parse preset name from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Some(Self::None),
            "cyberpunk" => Some(Self::Cyberpunk),
            "calm" => Some(Self::Calm),
            _ => None,
        }
    }

    /// Settings this preset stands for.
    pub fn settings(self) -> EffectSettings {
        match self {
            Self::None => EffectSettings::none(),
            Self::Cyberpunk => EffectSettings::default(),
            Self::Calm => EffectSettings {
                glitch_probability: 0.0,
                flicker_probability: 0.0,
                glitch_bar_probability: 0.0,
                scanline: false,
                border: false,
                ..EffectSettings::default()
            },
        }
    }
}

impl std::fmt::Display for EffectPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Cyberpunk => write!(f, "cyberpunk"),
            Self::Calm => write!(f, "calm"),
        }
    }
}

/// Which post effects run and how strongly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    /// Glow pass on bright glyphs
    pub glow: bool,
    /// Vertical wave offset in display units (0 disables)
    pub wave_amplitude: f32,
    /// Chance per glyph of a horizontal jitter
    pub glitch_probability: f64,
    /// Maximum jitter in display units
    pub glitch_offset: f32,
    /// Chance per glyph of an extra random glyph drawn on top
    pub flicker_probability: f64,
    /// Highlight cells whose brightness changed since the last frame
    pub motion_boost: bool,
    pub motion_threshold: u8,
    /// Keypoint markers on detected faces
    pub markers: bool,
    /// Horizontal scanline sweeping down the screen
    pub scanline: bool,
    /// Chance per frame of a glitch bar
    pub glitch_bar_probability: f64,
    /// Darkening at the corners, 0.0-1.0
    pub vignette: f32,
    pub border: bool,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            glow: true,
            wave_amplitude: 0.25,
            glitch_probability: 0.01,
            glitch_offset: 0.6,
            flicker_probability: 0.05,
            motion_boost: false,
            motion_threshold: 40,
            markers: true,
            scanline: true,
            glitch_bar_probability: 0.05,
            vignette: 0.7,
            border: true,
        }
    }
}

impl EffectSettings {
    /// All effects off.
    pub fn none() -> Self {
        Self {
            glow: false,
            wave_amplitude: 0.0,
            glitch_probability: 0.0,
            glitch_offset: 0.0,
            flicker_probability: 0.0,
            motion_boost: false,
            motion_threshold: 40,
            markers: false,
            scanline: false,
            glitch_bar_probability: 0.0,
            vignette: 0.0,
            border: false,
        }
    }
}

/// Clamp a probability into 0.0-1.0; NaN counts as never.
#[inline]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

// ============================================================================
// Glyph effects
// ============================================================================

/// Offset each glyph vertically by `sin(time * 2 + col * 0.1 + row * 0.1)`.
pub fn apply_wave(commands: &mut [DrawCommand], clock: &FrameClock, amplitude: f32) {
    if amplitude == 0.0 {
        return;
    }
    for cmd in commands {
        let (col, row) = cmd.cell;
        let phase = clock.time * 2.0 + col as f32 * 0.1 + row as f32 * 0.1;
        cmd.y += phase.sin() * amplitude;
    }
}

/// Randomly shift a few glyphs sideways.
pub fn apply_glitch<R: Rng + ?Sized>(
    commands: &mut [DrawCommand],
    rng: &mut R,
    probability: f64,
    max_offset: f32,
) {
    let p = clamp_probability(probability);
    if p == 0.0 || max_offset <= 0.0 {
        return;
    }
    for cmd in commands.iter_mut().filter(|c| c.pass == Pass::Base) {
        if rng.gen_bool(p) {
            cmd.x += rng.gen_range(-max_offset..max_offset);
        }
    }
}

/// Extra random glyphs drawn over a few base glyphs.
pub fn flicker_overlay<R: Rng + ?Sized>(
    commands: &[DrawCommand],
    ramp: &GlyphRamp,
    rng: &mut R,
    probability: f64,
) -> Vec<DrawCommand> {
    let p = clamp_probability(probability);
    if p == 0.0 {
        return Vec::new();
    }
    commands
        .iter()
        .filter(|c| c.pass == Pass::Base)
        .filter_map(|c| {
            if !rng.gen_bool(p) {
                return None;
            }
            let glyph = ramp.glyph_at(rng.gen_range(0..ramp.len()));
            Some(DrawCommand {
                glyph,
                color: ORANGE.with_alpha(100),
                glow: 0.0,
                ..*c
            })
        })
        .collect()
}

/// Last frame's brightness for one mapped region.
#[derive(Debug, Clone, Default)]
struct RegionHistory {
    previous: Vec<u8>,
    cols: u32,
    rows: u32,
}

/// Remembers last frame's brightness per mapped cell, one history per
/// region slot.
///
/// Slot `i` is the `i`-th face of a frame (or the whole frame when no face
/// is mapped). Cells of different regions are never compared.
#[derive(Debug, Clone, Default)]
pub struct MotionTracker {
    slots: Vec<RegionHistory>,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget history, e.g. after a resize.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Drop history for slots at or beyond `count`.
    pub fn retain(&mut self, count: usize) {
        self.slots.truncate(count);
    }

    /// Boost glyphs of region `slot` whose brightness moved by more than
    /// `threshold` since that slot's previous frame, then remember this one.
    ///
    /// # Returns
    /// The number of boosted cells.
    pub fn boost(&mut self, slot: usize, commands: &mut [DrawCommand], threshold: u8) -> usize {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, RegionHistory::default);
        }
        let history = &mut self.slots[slot];

        let (cols, rows) = commands
            .iter()
            .filter(|c| c.pass == Pass::Base)
            .fold((0, 0), |(w, h), c| (w.max(c.cell.0 + 1), h.max(c.cell.1 + 1)));

        let mut current = vec![0u8; cols as usize * rows as usize];
        let comparable = cols == history.cols && rows == history.rows;
        let mut boosted = 0;

        for cmd in commands.iter_mut().filter(|c| c.pass == Pass::Base) {
            let i = cmd.cell.1 as usize * cols as usize + cmd.cell.0 as usize;
            current[i] = cmd.brightness;
            if comparable && cmd.brightness.abs_diff(history.previous[i]) > threshold {
                cmd.color = lerp_color(cmd.color, AMBER, 0.5).with_alpha(cmd.color.a);
                cmd.glow = 1.0;
                boosted += 1;
            }
        }

        history.previous = current;
        history.cols = cols;
        history.rows = rows;
        boosted
    }
}

/// Pulsing markers at the key landmarks of a face.
///
/// Landmark indices missing from the face's keypoints are skipped.
pub fn keypoint_markers(face: &FaceDetection, map: &CoordinateMap, clock: &FrameClock) -> Vec<DrawCommand> {
    KEY_LANDMARKS
        .iter()
        .enumerate()
        .filter_map(|(i, &landmark)| face.keypoints.get(landmark).map(|kp| (i, kp)))
        .map(|(i, kp)| {
            let pulse = 3.0 + (clock.time * 3.0 + i as f32).sin() * 2.0;
            let (x, y) = map.to_display(kp.x.round() as i32, kp.y.round() as i32);
            DrawCommand {
                x,
                y,
                glyph: '●',
                color: AMBER,
                glow: (pulse / 5.0).clamp(0.0, 1.0),
                scale: 1.0,
                pass: Pass::Base,
                brightness: 255,
                cell: (0, 0),
            }
        })
        .collect()
}

// ============================================================================
// Screen effects
// ============================================================================

const SCANLINE_COLOR: Rgba = Rgba::rgb(255, 150, 0);
const BORDER_COLOR: Rgba = Rgba::rgb(255, 100, 0);

/// Row the scanline sits on for a given frame.
pub fn scanline_row(frame: u64, rows: u16) -> Option<u16> {
    (rows > 0).then(|| ((frame * 2) % rows as u64) as u16)
}

/// Run the enabled screen effects over a painted canvas.
pub fn apply_screen_effects<R: Rng + ?Sized>(
    canvas: &mut CellCanvas,
    settings: &EffectSettings,
    clock: &FrameClock,
    rng: &mut R,
) {
    if settings.scanline
        && let Some(row) = scanline_row(clock.frame, canvas.rows())
    {
        canvas.tint_row(row, SCANLINE_COLOR, 0.2);
    }

    let p = clamp_probability(settings.glitch_bar_probability);
    if p > 0.0 && canvas.rows() > 0 && rng.gen_bool(p) {
        let row = rng.gen_range(0..canvas.rows());
        canvas.tint_row(row, Rgba::rgb(255, 100, 0), 0.3);
    }

    if settings.vignette > 0.0 {
        apply_vignette(canvas, settings.vignette);
    }

    if settings.border {
        draw_border(canvas);
    }
}

/// Darken cells by their distance from the centre.
pub fn apply_vignette(canvas: &mut CellCanvas, strength: f32) {
    let (cols, rows) = (canvas.cols(), canvas.rows());
    if cols == 0 || rows == 0 {
        return;
    }
    let cx = (cols as f32 - 1.0) / 2.0;
    let cy = (rows as f32 - 1.0) / 2.0;
    let max = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);

    for row in 0..rows {
        for col in 0..cols {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt() / max;
            // Inner half of the screen stays untouched
            let falloff = ((d - 0.5) / 0.5).clamp(0.0, 1.0);
            canvas.darken(col, row, falloff * strength);
        }
    }
}

/// Box-drawing frame around the edge of the canvas.
pub fn draw_border(canvas: &mut CellCanvas) {
    let (cols, rows) = (canvas.cols(), canvas.rows());
    if cols < 2 || rows < 2 {
        return;
    }
    let (right, bottom) = (cols - 1, rows - 1);
    for col in 1..right {
        canvas.put(col, 0, '─', BORDER_COLOR);
        canvas.put(col, bottom, '─', BORDER_COLOR);
    }
    for row in 1..bottom {
        canvas.put(0, row, '│', BORDER_COLOR);
        canvas.put(right, row, '│', BORDER_COLOR);
    }
    canvas.put(0, 0, '┌', BORDER_COLOR);
    canvas.put(right, 0, '┐', BORDER_COLOR);
    canvas.put(0, bottom, '└', BORDER_COLOR);
    canvas.put(right, bottom, '┘', BORDER_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{DisplayRect, Region};
    use crate::face::Keypoint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(cols: u32, rows: u32, brightness: u8) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let mut cmd = DrawCommand::text(col as f32, row as f32, '#', AMBER);
                cmd.cell = (col, row);
                cmd.brightness = brightness;
                out.push(cmd);
            }
        }
        out
    }

    // ==================== Preset Tests ====================

    #[test]
    fn test_preset_from_str() {
        assert_eq!(EffectPreset::from_str("CYBERPUNK"), Some(EffectPreset::Cyberpunk));
        assert_eq!(EffectPreset::from_str("off"), Some(EffectPreset::None));
        assert_eq!(EffectPreset::from_str("sepia"), None);
    }

    #[test]
    fn test_preset_display_roundtrips() {
        for preset in [EffectPreset::None, EffectPreset::Cyberpunk, EffectPreset::Calm] {
            assert_eq!(EffectPreset::from_str(&preset.to_string()), Some(preset));
        }
    }

    #[test]
    fn test_calm_has_no_glitches() {
        let s = EffectPreset::Calm.settings();
        assert_eq!(s.glitch_probability, 0.0);
        assert_eq!(s.glitch_bar_probability, 0.0);
        assert!(s.wave_amplitude > 0.0);
    }

    // ==================== Glyph Effect Tests ====================

    #[test]
    fn test_wave_zero_amplitude_is_noop() {
        let mut cmds = grid(3, 3, 100);
        let before = cmds.clone();
        apply_wave(&mut cmds, &FrameClock { time: 1.3, frame: 130 }, 0.0);
        assert_eq!(cmds, before);
    }

    #[test]
    fn test_wave_bounded_by_amplitude() {
        let mut cmds = grid(10, 10, 100);
        apply_wave(&mut cmds, &FrameClock { time: 0.7, frame: 70 }, 0.5);
        for cmd in &cmds {
            let offset = cmd.y - cmd.cell.1 as f32;
            assert!(offset.abs() <= 0.5 + 1e-5);
            assert_eq!(cmd.x, cmd.cell.0 as f32);
        }
    }

    #[test]
    fn test_glitch_certain_moves_within_offset() {
        let mut cmds = grid(5, 5, 100);
        let mut rng = StdRng::seed_from_u64(3);
        apply_glitch(&mut cmds, &mut rng, 1.0, 0.6);
        for cmd in &cmds {
            assert!((cmd.x - cmd.cell.0 as f32).abs() < 0.6);
            assert_eq!(cmd.y, cmd.cell.1 as f32);
        }
    }

    #[test]
    fn test_flicker_probability_bounds() {
        let cmds = grid(4, 4, 100);
        let ramp = GlyphRamp::new("@#. ", Default::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert!(flicker_overlay(&cmds, &ramp, &mut rng, 0.0).is_empty());
        let all = flicker_overlay(&cmds, &ramp, &mut rng, 1.0);
        assert_eq!(all.len(), cmds.len());
        assert!(all.iter().all(|c| "@#. ".contains(c.glyph)));
    }

    #[test]
    fn test_motion_boost_detects_change() {
        let mut tracker = MotionTracker::new();
        let mut first = grid(3, 2, 50);
        assert_eq!(tracker.boost(0, &mut first, 40), 0);

        let mut second = grid(3, 2, 50);
        second[4].brightness = 200;
        assert_eq!(tracker.boost(0, &mut second, 40), 1);
        assert_eq!(second[4].glow, 1.0);
        assert_eq!(second[0].glow, 0.0);
    }

    #[test]
    fn test_motion_boost_resets_on_shape_change() {
        let mut tracker = MotionTracker::new();
        tracker.boost(0, &mut grid(3, 2, 0), 10);
        assert_eq!(tracker.boost(0, &mut grid(4, 2, 255), 10), 0);
    }

    #[test]
    fn test_motion_boost_keeps_faces_apart() {
        let mut tracker = MotionTracker::new();
        // Two same-shaped faces, one dark and one bright, every frame
        for frame in 0..3 {
            let dark = tracker.boost(0, &mut grid(4, 4, 10), 40);
            let bright = tracker.boost(1, &mut grid(4, 4, 250), 40);
            assert_eq!((frame, dark, bright), (frame, 0, 0));
        }
    }

    #[test]
    fn test_motion_retain_drops_departed_faces() {
        let mut tracker = MotionTracker::new();
        tracker.boost(0, &mut grid(2, 2, 10), 40);
        tracker.boost(1, &mut grid(2, 2, 250), 40);
        tracker.retain(1);
        // A face returning in slot 1 starts without history
        assert_eq!(tracker.boost(1, &mut grid(2, 2, 10), 40), 0);
        assert_eq!(tracker.boost(1, &mut grid(2, 2, 250), 40), 4);
    }

    #[test]
    fn test_keypoint_markers_only_for_present_landmarks() {
        let map = CoordinateMap::new(
            Region::new(0, 0, 100, 100),
            DisplayRect::new(0.0, 0.0, 50.0, 25.0),
        )
        .unwrap();
        let clock = FrameClock::new();

        let few = FaceDetection {
            bounds: Region::new(0, 0, 100, 100),
            keypoints: vec![Keypoint::new(10.0, 10.0); 5],
        };
        // Landmarks 1, 4 and 0 exist in a 5-point set
        assert_eq!(keypoint_markers(&few, &map, &clock).len(), 3);

        let full = FaceDetection {
            bounds: Region::new(0, 0, 100, 100),
            keypoints: vec![Keypoint::new(10.0, 10.0); 468],
        };
        let markers = keypoint_markers(&full, &map, &clock);
        assert_eq!(markers.len(), KEY_LANDMARKS.len());
        assert!(markers.iter().all(|m| m.glow > 0.0 && m.glow <= 1.0));
        assert_eq!(markers[0].x, 5.0);
    }

    #[test]
    fn test_nan_probability_never_fires() {
        assert_eq!(clamp_probability(f64::NAN), 0.0);
        assert_eq!(clamp_probability(-1.0), 0.0);
        assert_eq!(clamp_probability(7.0), 1.0);

        let mut cmds = grid(3, 3, 100);
        let before = cmds.clone();
        let ramp = GlyphRamp::new("@#. ", Default::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        apply_glitch(&mut cmds, &mut rng, f64::NAN, 0.6);
        assert_eq!(cmds, before);
        assert!(flicker_overlay(&cmds, &ramp, &mut rng, f64::NAN).is_empty());

        let mut canvas = CellCanvas::new(4, 4);
        let settings = EffectSettings {
            glitch_bar_probability: f64::NAN,
            ..EffectSettings::none()
        };
        apply_screen_effects(&mut canvas, &settings, &FrameClock::new(), &mut rng);
        assert_eq!(canvas.cell(0, 0).unwrap().bg, Rgba::rgb(0, 0, 0));
    }

    // ==================== Screen Effect Tests ====================

    #[test]
    fn test_scanline_sweeps() {
        assert_eq!(scanline_row(0, 10), Some(0));
        assert_eq!(scanline_row(3, 10), Some(6));
        assert_eq!(scanline_row(5, 10), Some(0));
        assert_eq!(scanline_row(1, 0), None);
    }

    #[test]
    fn test_border_draws_corners() {
        let mut canvas = CellCanvas::new(4, 3);
        draw_border(&mut canvas);
        assert_eq!(canvas.to_plain_string(), "┌──┐\n│  │\n└──┘");
    }

    #[test]
    fn test_vignette_keeps_centre() {
        let mut canvas = CellCanvas::new(11, 11);
        for row in 0..11 {
            for col in 0..11 {
                canvas.put(col, row, '#', AMBER);
            }
        }
        apply_vignette(&mut canvas, 1.0);
        assert_eq!(canvas.cell(5, 5).unwrap().fg, AMBER);
        assert_eq!(canvas.cell(0, 0).unwrap().fg, Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn test_screen_effects_none_is_noop() {
        let mut canvas = CellCanvas::new(6, 4);
        canvas.put(2, 2, 'x', AMBER);
        let before = canvas.to_plain_string();
        let mut rng = StdRng::seed_from_u64(1);
        apply_screen_effects(&mut canvas, &EffectSettings::none(), &FrameClock::new(), &mut rng);
        assert_eq!(canvas.to_plain_string(), before);
        assert_eq!(canvas.cell(2, 2).unwrap().fg, AMBER);
    }
}
