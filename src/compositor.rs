//! Per-frame composition.
//!
//! A frame is built in layers, back to front:
//!
//! 1. Paper fill (halftone mode only)
//! 2. Background: matrix rain or the stripe field
//! 3. Glyphs mapped from each face region, or from the whole frame when no
//!    face is available and the [`NoFacePolicy`] allows it
//! 4. Glyph effects (motion boost, wave, glitch, flicker) and keypoint markers
//! 5. Stripe overlay, when stripes are the background
//! 6. HUD text, painted after the screen effects so it stays readable
//!
//! All mutable animation data lives in [`AnimationState`], which the caller
//! owns and passes into [`Compositor::render_frame`] every frame.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ascii::{
    fit_stride, map_region_into, CoordinateMap, DisplayRect, DrawCommand, GlowSettings, GlyphRamp,
    MapperSettings, RampPreset, Region, Rgba, SampleMode, HALFTONE_INK, HALFTONE_PAPER, ORANGE,
};
use crate::clock::FrameClock;
use crate::effects::{
    apply_glitch, apply_screen_effects, apply_wave, flicker_overlay, keypoint_markers,
    EffectSettings, MotionTracker,
};
use crate::face::{DetectionState, FaceDetection, Keypoint, NoFacePolicy};
use crate::rain::{MatrixRain, RainConfig};
use crate::source::PixelBuffer;
use crate::stripes::{Blend, StripeField, StripeLayer, DEFAULT_STRIPE_COUNT};
use crate::terminal::{CellCanvas, StatusBar, StatusInfo};

const HUD_COLOR: Rgba = Rgba::rgb(255, 136, 0);

/// Everything that changes from one frame to the next.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub clock: FrameClock,
    pub rain: MatrixRain,
    pub stripes: StripeField,
    pub motion: MotionTracker,
    rng: StdRng,
    cols: u16,
    rows: u16,
}

impl AnimationState {
    /// Create state for a `cols` x `rows` display with a seeded RNG.
    pub fn new(cols: u16, rows: u16, rain: RainConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let rain = MatrixRain::new(cols as f32, rows as f32, rain, &mut rng);
        let stripes = StripeField::new(DEFAULT_STRIPE_COUNT, &mut rng);
        Self {
            clock: FrameClock::new(),
            rain,
            stripes,
            motion: MotionTracker::new(),
            rng,
            cols,
            rows,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Adopt a new display size; rain layout is re-derived and motion
    /// history dropped.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.rain.resize(cols as f32, rows as f32, &mut self.rng);
        self.motion.reset();
    }

    /// Replace the stripe field with `count` fresh stripes.
    pub fn with_stripes(mut self, count: usize) -> Self {
        self.stripes = StripeField::new(count, &mut self.rng);
        self
    }
}

/// What is drawn behind the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    None,
    #[default]
    Rain,
    Stripes,
}

impl Background {
    pub fn name(&self) -> &'static str {
        match self {
            Background::None => "none",
            Background::Rain => "rain",
            Background::Stripes => "stripes",
        }
    }
}

/// How sampled pixels turn into glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Brightness picks a glyph from the configured ramp
    #[default]
    Ascii,
    /// Red-channel darkness picks a dot size; black dots on orange paper
    Halftone,
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Ascii => "ascii",
            RenderMode::Halftone => "halftone",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ascii" => Some(RenderMode::Ascii),
            "halftone" => Some(RenderMode::Halftone),
            _ => None,
        }
    }
}

/// What the glyph layer showed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Source had no frame; loading indicator only
    Loading,
    /// Glyphs mapped from this many face regions
    Faces(usize),
    /// No face; whole frame mapped
    WholeFrame,
    /// No face; glyph layer left out
    Suppressed,
}

/// Output of one [`Compositor::render_frame`] call.
#[derive(Debug, Clone)]
pub struct ComposedFrame {
    /// Rain, glyphs, effects and markers in paint order
    pub commands: Vec<DrawCommand>,
    /// Text painted on top of everything
    pub hud: Vec<DrawCommand>,
    pub status: FrameStatus,
}

/// Settings the compositor reads every frame.
#[derive(Debug, Clone)]
pub struct CompositorSettings {
    pub ramp: GlyphRamp,
    /// Shown in the status line; a preset name or "custom"
    pub ramp_name: String,
    /// Square sampling stride in source pixels; `None` fits one sample per
    /// display cell on both axes
    pub stride: Option<u32>,
    pub mirror: bool,
    pub skip_blank: bool,
    pub no_face: NoFacePolicy,
    /// Padding around keypoint bounds, in source pixels
    pub face_padding: i32,
    pub background: Background,
    pub mode: RenderMode,
    pub effects: EffectSettings,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        let preset = RampPreset::default();
        Self {
            ramp: preset.ramp(),
            ramp_name: preset.name().to_string(),
            stride: None,
            mirror: false,
            skip_blank: true,
            no_face: NoFacePolicy::default(),
            face_padding: 20,
            background: Background::default(),
            mode: RenderMode::default(),
            effects: EffectSettings::default(),
        }
    }
}

/// Turns a source frame and detection results into draw commands.
#[derive(Debug, Clone)]
pub struct Compositor {
    settings: CompositorSettings,
    halftone_ramp: GlyphRamp,
    status_bar: StatusBar,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorSettings::default())
    }
}

impl Compositor {
    pub fn new(settings: CompositorSettings) -> Self {
        Self {
            settings,
            halftone_ramp: GlyphRamp::halftone(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    pub fn status_bar_mut(&mut self) -> &mut StatusBar {
        &mut self.status_bar
    }

    /// Switch to the next ramp preset. A custom ramp cycles to the first preset.
    pub fn cycle_ramp(&mut self) -> RampPreset {
        let next = RampPreset::from_name(&self.settings.ramp_name)
            .map(|p| p.next())
            .unwrap_or_default();
        self.settings.ramp = next.ramp();
        self.settings.ramp_name = next.name().to_string();
        log::info!("Ramp: {}", next.name());
        next
    }

    /// Returns the new glow state.
    pub fn toggle_glow(&mut self) -> bool {
        self.settings.effects.glow = !self.settings.effects.glow;
        self.settings.effects.glow
    }

    /// Returns the new mirror state.
    pub fn toggle_mirror(&mut self) -> bool {
        self.settings.mirror = !self.settings.mirror;
        self.settings.mirror
    }

    /// Flip between ASCII and halftone rendering.
    pub fn toggle_halftone(&mut self) -> RenderMode {
        self.settings.mode = match self.settings.mode {
            RenderMode::Ascii => RenderMode::Halftone,
            RenderMode::Halftone => RenderMode::Ascii,
        };
        log::info!("Mode: {}", self.settings.mode.name());
        self.settings.mode
    }

    /// Ramp the glyph layer reads this frame.
    fn active_ramp(&self) -> &GlyphRamp {
        match self.settings.mode {
            RenderMode::Ascii => &self.settings.ramp,
            RenderMode::Halftone => &self.halftone_ramp,
        }
    }

    fn ramp_label(&self) -> &str {
        match self.settings.mode {
            RenderMode::Ascii => &self.settings.ramp_name,
            RenderMode::Halftone => RenderMode::Halftone.name(),
        }
    }

    /// Advance the animation one frame and compose it.
    ///
    /// # Arguments
    /// * `state` - Animation state; clock and rain advance, RNG is consumed
    /// * `frame` - Current source frame, `None` if the source is not ready
    /// * `detections` - Latest face detection result
    /// * `source_name` - Shown in the status line
    pub fn render_frame(
        &self,
        state: &mut AnimationState,
        frame: Option<&PixelBuffer>,
        detections: &DetectionState,
        source_name: &str,
    ) -> ComposedFrame {
        state.clock.tick();
        state.rain.update(&mut state.rng);

        let (cols, rows) = state.size();
        let mut commands = Vec::new();
        let mut hud = Vec::new();

        let Some(buffer) = frame.filter(|b| b.is_ready()) else {
            loading_text(cols, rows, &mut hud);
            return ComposedFrame {
                commands,
                hud,
                status: FrameStatus::Loading,
            };
        };

        let halftone = self.settings.mode == RenderMode::Halftone;
        let paper = if halftone { HALFTONE_PAPER } else { Rgba::rgb(0, 0, 0) };
        if halftone {
            for row in 0..rows {
                for col in 0..cols {
                    commands.push(DrawCommand::fill(col as f32, row as f32, paper));
                }
            }
        }

        // Stripes live on a frame-counted timeline
        let stripe_time = state.clock.frame as f32;
        match self.settings.background {
            Background::None => {}
            Background::Rain => state.rain.draw_into(&mut commands),
            Background::Stripes => {
                let blend = if halftone { Blend::Multiply } else { Blend::Normal };
                state.stripes.draw_into(
                    StripeLayer::Background,
                    stripe_time,
                    (cols, rows),
                    paper,
                    blend,
                    &mut commands,
                );
            }
        }

        let start = commands.len();
        let mut markers = Vec::new();
        let mut spans = Vec::new();
        let status =
            self.glyph_layer(buffer, detections, state, &mut commands, &mut markers, &mut spans);

        let effects = &self.settings.effects;
        if effects.motion_boost {
            for (slot, span) in spans.iter().enumerate() {
                state.motion.boost(slot, &mut commands[span.clone()], effects.motion_threshold);
            }
            state.motion.retain(spans.len());
        }
        let layer = &mut commands[start..];
        apply_wave(layer, &state.clock, effects.wave_amplitude);
        apply_glitch(layer, &mut state.rng, effects.glitch_probability, effects.glitch_offset);
        let flicker = flicker_overlay(
            &commands[start..],
            self.active_ramp(),
            &mut state.rng,
            effects.flicker_probability,
        );
        commands.extend(flicker);
        commands.extend(markers);

        if self.settings.background == Background::Stripes {
            state.stripes.draw_into(
                StripeLayer::Overlay,
                stripe_time,
                (cols, rows),
                paper,
                Blend::Screen,
                &mut commands,
            );
        }

        if self.status_bar.visible {
            self.hud_text(status, detections, source_name, cols, rows, &mut hud);
        }

        ComposedFrame {
            commands,
            hud,
            status,
        }
    }

    /// Paint a composed frame onto the canvas, screen effects included.
    pub fn paint(&self, canvas: &mut CellCanvas, frame: &ComposedFrame, state: &mut AnimationState) {
        canvas.clear();
        canvas.apply(&frame.commands);
        if frame.status != FrameStatus::Loading {
            apply_screen_effects(canvas, &self.settings.effects, &state.clock, &mut state.rng);
        }
        canvas.apply(&frame.hud);
    }

    fn glyph_layer(
        &self,
        buffer: &PixelBuffer,
        detections: &DetectionState,
        state: &AnimationState,
        out: &mut Vec<DrawCommand>,
        markers: &mut Vec<DrawCommand>,
        spans: &mut Vec<Range<usize>>,
    ) -> FrameStatus {
        let (w, h) = (buffer.width, buffer.height);
        let faces = detections.faces();

        if faces.is_empty() {
            return match self.settings.no_face {
                NoFacePolicy::WholeFrame => {
                    let start = out.len();
                    self.map_into(buffer, Region::full(w, h), state, out);
                    spans.push(start..out.len());
                    FrameStatus::WholeFrame
                }
                NoFacePolicy::Suppress => FrameStatus::Suppressed,
            };
        }

        for face in faces {
            let mut region = face.sampling_region(self.settings.face_padding, w, h);
            if self.settings.mirror {
                region = mirror_region(region, w);
            }
            let start = out.len();
            let target = self.map_into(buffer, region, state, out);
            spans.push(start..out.len());

            if self.settings.effects.markers
                && !face.keypoints.is_empty()
                && let Some(map) = CoordinateMap::new(region, target)
            {
                let face = if self.settings.mirror {
                    mirror_keypoints(face, w)
                } else {
                    face.clone()
                };
                markers.extend(keypoint_markers(&face, &map, &state.clock));
            }
        }

        FrameStatus::Faces(faces.len())
    }

    /// Map one region onto the part of the display it covers.
    fn map_into(
        &self,
        buffer: &PixelBuffer,
        region: Region,
        state: &AnimationState,
        out: &mut Vec<DrawCommand>,
    ) -> DisplayRect {
        let (cols, rows) = state.size();
        let target =
            DisplayRect::from_source_region(region, buffer.width, buffer.height, cols as f32, rows as f32);
        if target.is_empty() {
            return target;
        }

        let cells = |len: f32| len.ceil().min(u16::MAX as f32) as u16;
        let (stride, row_stride) = match self.settings.stride {
            Some(stride) => (stride, None),
            None => (
                fit_stride(region.width.max(0) as u32, cells(target.width)),
                Some(fit_stride(region.height.max(0) as u32, cells(target.height))),
            ),
        };
        let base = MapperSettings {
            mirror: self.settings.mirror,
            skip_blank: self.settings.skip_blank,
            row_stride,
            ..MapperSettings::new(target)
        };
        let settings = match self.settings.mode {
            RenderMode::Ascii => MapperSettings {
                glow: self.settings.effects.glow.then(GlowSettings::default),
                ..base
            },
            RenderMode::Halftone => MapperSettings {
                skip_blank: true,
                deep: HALFTONE_INK,
                bright: HALFTONE_INK,
                glow: None,
                sample: SampleMode::RedDarkness,
                ..base
            },
        };
        map_region_into(buffer, region, stride, self.active_ramp(), &settings, out);
        target
    }

    fn hud_text(
        &self,
        status: FrameStatus,
        detections: &DetectionState,
        source_name: &str,
        cols: u16,
        rows: u16,
        out: &mut Vec<DrawCommand>,
    ) {
        // Keep clear of the border
        let inset = if self.settings.effects.border { 1 } else { 0 };
        if rows < 1 + 2 * inset || cols <= 2 * inset {
            return;
        }
        let width = (cols - 2 * inset) as usize;
        let bottom = (rows - 1 - inset) as f32;

        let faces = match status {
            FrameStatus::Faces(n) => Some(n),
            _ if detections.is_pending() => None,
            _ => Some(0),
        };
        let info = StatusInfo {
            source: source_name,
            ramp: self.ramp_label(),
            faces,
            glow: self.settings.effects.glow,
            mirror: self.settings.mirror,
        };
        let line: String = self.status_bar.format(&info).chars().take(width).collect();
        out.extend(DrawCommand::line(inset as f32, bottom, &line, HUD_COLOR));

        if matches!(status, FrameStatus::Faces(_)) && bottom >= 1.0 + inset as f32 {
            let label: String = "FACE DETECTED".chars().take(width).collect();
            out.extend(DrawCommand::line(inset as f32, bottom - 1.0, &label, HUD_COLOR));
        }
    }
}

/// Centred loading indicator.
fn loading_text(cols: u16, rows: u16, out: &mut Vec<DrawCommand>) {
    let mid = rows / 2;
    for (offset, text) in [(0, "INITIALIZING..."), (2, "Waiting for frame source")] {
        let len = text.chars().count() as u16;
        let x = cols.saturating_sub(len) / 2;
        out.extend(DrawCommand::line(x as f32, (mid + offset) as f32, text, ORANGE));
    }
}

/// The region whose mirrored read covers `region`.
fn mirror_region(region: Region, width: u32) -> Region {
    Region::new(width as i32 - region.right(), region.y, region.width, region.height)
}

fn mirror_keypoints(face: &FaceDetection, width: u32) -> FaceDetection {
    let last = width.saturating_sub(1) as f32;
    FaceDetection {
        bounds: face.bounds,
        keypoints: face
            .keypoints
            .iter()
            .map(|kp| Keypoint::new(last - kp.x, kp.y))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::RampOrder;
    use std::sync::Arc;

    fn quiet_settings() -> CompositorSettings {
        CompositorSettings {
            ramp: GlyphRamp::new("@#. ", RampOrder::DenseToSparse).unwrap(),
            ramp_name: "custom".to_string(),
            stride: Some(1),
            skip_blank: false,
            background: Background::None,
            effects: EffectSettings::none(),
            ..CompositorSettings::default()
        }
    }

    fn gray(w: u32, h: u32, v: u8) -> PixelBuffer {
        PixelBuffer::filled(w, h, Rgba::rgb(v, v, v))
    }

    #[test]
    fn test_loading_when_no_frame() {
        let compositor = Compositor::default();
        let mut state = AnimationState::new(40, 12, RainConfig::default(), 1);
        let frame = compositor.render_frame(&mut state, None, &DetectionState::Pending, "procedural");
        assert_eq!(frame.status, FrameStatus::Loading);
        assert!(frame.commands.is_empty());
        let text: String = frame.hud.iter().map(|c| c.glyph).collect();
        assert!(text.contains("INITIALIZING..."));
        assert_eq!(state.clock.frame, 1);
    }

    #[test]
    fn test_whole_frame_when_no_faces() {
        let mut compositor = Compositor::new(quiet_settings());
        compositor.status_bar_mut().visible = false;
        let mut state = AnimationState::new(4, 4, RainConfig::default(), 1);
        let buffer = gray(4, 4, 128);
        let frame = compositor.render_frame(&mut state, Some(&buffer), &DetectionState::Pending, "static");
        assert_eq!(frame.status, FrameStatus::WholeFrame);
        assert_eq!(frame.commands.len(), 16);
        assert!(frame.commands.iter().all(|c| c.glyph == '#'));
        assert!(frame.hud.is_empty());
    }

    #[test]
    fn test_suppress_policy_draws_no_glyphs() {
        let settings = CompositorSettings {
            no_face: NoFacePolicy::Suppress,
            ..quiet_settings()
        };
        let compositor = Compositor::new(settings);
        let mut state = AnimationState::new(4, 4, RainConfig::default(), 1);
        let buffer = gray(4, 4, 128);
        let frame = compositor.render_frame(
            &mut state,
            Some(&buffer),
            &DetectionState::Ready(Arc::new(Vec::new())),
            "static",
        );
        assert_eq!(frame.status, FrameStatus::Suppressed);
        assert!(frame.commands.is_empty());
    }

    #[test]
    fn test_face_region_mapped_to_its_display_area() {
        let compositor = Compositor::new(CompositorSettings {
            face_padding: 0,
            ..quiet_settings()
        });
        let mut state = AnimationState::new(8, 8, RainConfig::default(), 1);
        let buffer = gray(8, 8, 200);
        let faces = vec![FaceDetection::from_bounds(Region::new(4, 4, 4, 4))];
        let frame = compositor.render_frame(
            &mut state,
            Some(&buffer),
            &DetectionState::Ready(Arc::new(faces)),
            "static",
        );
        assert_eq!(frame.status, FrameStatus::Faces(1));
        assert_eq!(frame.commands.len(), 16);
        assert!(frame.commands.iter().all(|c| c.x >= 4.0 && c.y >= 4.0));

        let hud: String = frame.hud.iter().map(|c| c.glyph).collect();
        assert!(hud.contains("FACE DETECTED"));
    }

    #[test]
    fn test_mirror_region() {
        assert_eq!(mirror_region(Region::new(0, 2, 3, 3), 10), Region::new(7, 2, 3, 3));
    }

    #[test]
    fn test_cycle_ramp_from_custom_starts_at_default() {
        let mut compositor = Compositor::new(quiet_settings());
        assert_eq!(compositor.cycle_ramp(), RampPreset::Dense);
        assert_eq!(compositor.cycle_ramp(), RampPreset::Classic);
        assert_eq!(compositor.settings().ramp_name, "classic");
    }

    #[test]
    fn test_toggles() {
        let mut compositor = Compositor::default();
        assert!(!compositor.toggle_glow());
        assert!(compositor.toggle_mirror());
    }

    #[test]
    fn test_resize_rederives_rain() {
        let mut state = AnimationState::new(20, 10, RainConfig::default(), 3);
        assert_eq!(state.rain.columns().len(), 10);
        state.resize(40, 10);
        assert_eq!(state.size(), (40, 10));
        assert_eq!(state.rain.columns().len(), 20);
    }

    #[test]
    fn test_paint_fills_canvas() {
        let compositor = Compositor::new(quiet_settings());
        let mut state = AnimationState::new(6, 3, RainConfig::default(), 1);
        let buffer = gray(6, 3, 255);
        let frame = compositor.render_frame(&mut state, Some(&buffer), &DetectionState::Pending, "static");
        let mut canvas = CellCanvas::new(6, 3);
        compositor.paint(&mut canvas, &frame, &mut state);
        let text = canvas.to_plain_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "@@@@@@");
        assert!(lines[2].starts_with("CYBERP"));
    }

    // ==================== Sampling Tests ====================

    #[test]
    fn test_fitted_stride_gives_one_glyph_per_cell() {
        let compositor = Compositor::new(CompositorSettings {
            stride: None,
            ..quiet_settings()
        });
        let mut state = AnimationState::new(80, 24, RainConfig::default(), 1);
        let buffer = gray(640, 480, 128);
        let frame = compositor.render_frame(&mut state, Some(&buffer), &DetectionState::Pending, "static");
        assert_eq!(frame.commands.len(), 80 * 24);

        let mut canvas = CellCanvas::new(80, 24);
        assert_eq!(canvas.apply(&frame.commands), 80 * 24);
        let mut cells: Vec<(u32, u32)> = frame.commands.iter().map(|c| c.cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 80 * 24);
    }

    #[test]
    fn test_motion_boost_compares_each_face_with_itself() {
        let compositor = Compositor::new(CompositorSettings {
            face_padding: 0,
            effects: EffectSettings {
                motion_boost: true,
                ..EffectSettings::none()
            },
            ..quiet_settings()
        });
        let mut state = AnimationState::new(16, 8, RainConfig::default(), 1);
        // Dark left half, bright right half, one face on each
        let mut buffer = gray(16, 8, 0);
        for y in 0..8 {
            for x in 8..16 {
                buffer.set_pixel(x, y, Rgba::rgb(255, 255, 255));
            }
        }
        let faces = vec![
            FaceDetection::from_bounds(Region::new(0, 0, 8, 8)),
            FaceDetection::from_bounds(Region::new(8, 0, 8, 8)),
        ];
        let detections = DetectionState::Ready(Arc::new(faces));

        for _ in 0..3 {
            let frame = compositor.render_frame(&mut state, Some(&buffer), &detections, "static");
            assert_eq!(frame.status, FrameStatus::Faces(2));
            assert_eq!(frame.commands.len(), 128);
            assert!(frame.commands.iter().all(|c| c.glow < 1.0));
        }
    }

    // ==================== Halftone And Stripes Tests ====================

    #[test]
    fn test_halftone_dots_on_paper() {
        let mut compositor = Compositor::new(CompositorSettings {
            mode: RenderMode::Halftone,
            ..quiet_settings()
        });
        compositor.status_bar_mut().visible = false;
        let mut state = AnimationState::new(2, 1, RainConfig::default(), 1);
        // Read with a stride of one: dark red on the left, white on the right
        let mut buffer = PixelBuffer::filled(2, 1, Rgba::rgb(255, 255, 255));
        buffer.set_pixel(0, 0, Rgba::rgb(0, 200, 200));
        let frame = compositor.render_frame(&mut state, Some(&buffer), &DetectionState::Pending, "static");

        let mut canvas = CellCanvas::new(2, 1);
        compositor.paint(&mut canvas, &frame, &mut state);
        assert_eq!(canvas.to_plain_string(), "● ");
        assert_eq!(canvas.cell(0, 0).unwrap().fg, HALFTONE_INK);
        assert_eq!(canvas.cell(1, 0).unwrap().bg, HALFTONE_PAPER);
    }

    #[test]
    fn test_halftone_toggle_and_status_label() {
        let mut compositor = Compositor::default();
        assert_eq!(compositor.ramp_label(), "dense");
        assert_eq!(compositor.toggle_halftone(), RenderMode::Halftone);
        assert_eq!(compositor.ramp_label(), "halftone");
        assert_eq!(compositor.toggle_halftone(), RenderMode::Ascii);
    }

    #[test]
    fn test_stripes_background_paints_fills_only() {
        use crate::ascii::Pass;
        use crate::stripes::Stripe;

        let mut compositor = Compositor::new(CompositorSettings {
            background: Background::Stripes,
            no_face: NoFacePolicy::Suppress,
            ..quiet_settings()
        });
        compositor.status_bar_mut().visible = false;
        let mut state = AnimationState::new(12, 6, RainConfig::default(), 1);
        state.stripes = StripeField::from_stripes(vec![Stripe {
            x: 600.0,
            y: 400.0,
            w: 4000.0,
            h: 4000.0,
            angle: 0.0,
            speed: 0.0,
            thickness: 4000.0,
            color: Rgba::rgba(240, 100, 50, 255),
            offset_x: 0.0,
            offset_y: 0.0,
        }]);
        let buffer = gray(12, 6, 255);
        let frame = compositor.render_frame(
            &mut state,
            Some(&buffer),
            &DetectionState::Ready(Arc::new(Vec::new())),
            "static",
        );
        // Stripe 0 paints under and over the glyph layer
        assert_eq!(frame.commands.len(), 2 * 72);
        assert!(frame.commands.iter().all(|c| c.pass == Pass::Fill));

        let mut canvas = CellCanvas::new(12, 6);
        compositor.paint(&mut canvas, &frame, &mut state);
        assert_eq!(canvas.cell(3, 3).unwrap().bg, Rgba::rgb(240, 100, 50));
    }

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in [RenderMode::Ascii, RenderMode::Halftone] {
            assert_eq!(RenderMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(RenderMode::from_name("sepia"), None);
        assert_eq!(Background::Stripes.name(), "stripes");
    }
}
