//! Brightness-to-glyph mapping over a sampling grid.
//!
//! This is the core of the crate: a region of a [`PixelBuffer`] is sampled
//! every `stride` pixels, each sample's brightness picks a glyph from a
//! [`GlyphRamp`], and each sampled cell becomes one [`DrawCommand`] in
//! display space.

use super::brightness::{mean_brightness, red_darkness};
use super::dimensions::{CoordinateMap, DisplayRect, Region};
use super::palette::{gradient_color, Rgba, AMBER, DEEP_ORANGE, GLOW_ORANGE};
use super::ramp::GlyphRamp;
use crate::source::PixelBuffer;

/// Which rendering pass a draw command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pass {
    /// The glyph itself.
    #[default]
    Base,
    /// A larger, blurred halo drawn over a bright glyph.
    Glow,
    /// Background colour only; the glyph is ignored.
    Fill,
}

/// How a sampled pixel becomes the value that picks a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleMode {
    /// Unweighted RGB mean
    #[default]
    Mean,
    /// `255 - R`; dark red picks the densest glyph. Used for halftone dots.
    RedDarkness,
}

/// One glyph to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Destination X in display units
    pub x: f32,
    /// Destination Y in display units
    pub y: f32,
    pub glyph: char,
    pub color: Rgba,
    /// Glow/shadow intensity, 0.0-1.0
    pub glow: f32,
    /// Relative glyph size (1.0 = one cell)
    pub scale: f32,
    pub pass: Pass,
    /// Sampled brightness that produced this command
    pub brightness: u8,
    /// Grid column/row of the sampled cell within the region
    pub cell: (u32, u32),
}

impl DrawCommand {
    /// A plain text glyph at a display position.
    pub fn text(x: f32, y: f32, glyph: char, color: Rgba) -> Self {
        Self {
            x,
            y,
            glyph,
            color,
            glow: 0.0,
            scale: 1.0,
            pass: Pass::Base,
            brightness: 255,
            cell: (0, 0),
        }
    }

    /// Background-only paint of one cell.
    pub fn fill(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            pass: Pass::Fill,
            ..Self::text(x, y, ' ', color)
        }
    }

    /// Emit one command per character of `text`, left to right.
    pub fn line(x: f32, y: f32, text: &str, color: Rgba) -> Vec<Self> {
        text.chars()
            .enumerate()
            .map(|(i, c)| Self::text(x + i as f32, y, c, color))
            .collect()
    }
}

/// Second-pass glow for bright cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowSettings {
    /// Brightness above which a glow pass is emitted
    pub threshold: u8,
    /// Colour of the glow pass
    pub color: Rgba,
    /// Size of the glow glyph relative to the base glyph
    pub scale: f32,
    /// Glow intensity of base glyphs below the threshold
    pub dim_intensity: f32,
    /// Glow intensity of base glyphs above the threshold
    pub bright_intensity: f32,
}

impl Default for GlowSettings {
    fn default() -> Self {
        Self {
            threshold: 150,
            color: GLOW_ORANGE,
            scale: 4.0 / 3.0,
            dim_intensity: 0.25,
            bright_intensity: 0.75,
        }
    }
}

/// Parameters for [`map_region_to_glyphs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapperSettings {
    /// Display rectangle the region is stretched over
    pub target: DisplayRect,
    /// Read pixels mirrored horizontally (selfie view)
    pub mirror: bool,
    /// Skip cells whose glyph is a space
    pub skip_blank: bool,
    /// Colour at brightness 0
    pub deep: Rgba,
    /// Colour at brightness 255
    pub bright: Rgba,
    /// Glow pass; `None` disables glow entirely
    pub glow: Option<GlowSettings>,
    /// Vertical cell size in source pixels; `None` uses the stride
    pub row_stride: Option<u32>,
    pub sample: SampleMode,
}

impl MapperSettings {
    pub fn new(target: DisplayRect) -> Self {
        Self {
            target,
            mirror: false,
            skip_blank: false,
            deep: DEEP_ORANGE,
            bright: AMBER,
            glow: Some(GlowSettings::default()),
            row_stride: None,
            sample: SampleMode::Mean,
        }
    }
}

/// Number of cells a region yields: `ceil(w / stride) * ceil(h / stride)`
/// after clamping to the buffer.
pub fn mapped_cell_count(buffer: &PixelBuffer, region: Region, stride: u32) -> usize {
    let clamped = region.clamp_to(buffer.width, buffer.height);
    if clamped.is_empty() {
        return 0;
    }
    let stride = stride.max(1);
    let cols = (clamped.width as u32).div_ceil(stride) as usize;
    let rows = (clamped.height as u32).div_ceil(stride) as usize;
    cols * rows
}

/// Map a region of a pixel buffer to glyph draw commands.
///
/// # Arguments
/// * `buffer` - Source pixels (read-only)
/// * `region` - Area to sample; clamped to the buffer, never read out of bounds
/// * `stride` - Cell size in source pixels (0 is treated as 1); cells are
///   `settings.row_stride` tall when that is set
/// * `ramp` - Glyph ramp
/// * `settings` - Target rectangle, colours, glow and sample mode
///
/// # Returns
/// One base command per sampled cell (fewer when `skip_blank` is set), each
/// followed by a glow command when the cell is above the glow threshold.
/// An empty or fully outside region yields no commands.
pub fn map_region_to_glyphs(
    buffer: &PixelBuffer,
    region: Region,
    stride: u32,
    ramp: &GlyphRamp,
    settings: &MapperSettings,
) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(mapped_cell_count(buffer, region, stride));
    map_region_into(buffer, region, stride, ramp, settings, &mut out);
    out
}

/// Allocation-free version of [`map_region_to_glyphs`].
///
/// Commands are appended to `out`; the number appended is returned.
pub fn map_region_into(
    buffer: &PixelBuffer,
    region: Region,
    stride: u32,
    ramp: &GlyphRamp,
    settings: &MapperSettings,
    out: &mut Vec<DrawCommand>,
) -> usize {
    let start = out.len();

    let clamped = region.clamp_to(buffer.width, buffer.height);
    // The map is built from the requested region so that clamping drops
    // cells without shifting the ones that remain.
    let Some(map) = CoordinateMap::new(region, settings.target) else {
        return 0;
    };
    if clamped.is_empty() {
        return 0;
    }

    let stride = stride.max(1) as usize;
    let row_stride = settings.row_stride.map_or(stride, |s| s.max(1) as usize);
    let last_x = buffer.width - 1;

    for (row, y) in (clamped.y..clamped.bottom()).step_by(row_stride).enumerate() {
        for (col, x) in (clamped.x..clamped.right()).step_by(stride).enumerate() {
            let read_x = if settings.mirror { last_x - x as u32 } else { x as u32 };
            let Some(px) = buffer.pixel(read_x, y as u32) else {
                continue;
            };

            let brightness = match settings.sample {
                SampleMode::Mean => mean_brightness(px.r, px.g, px.b),
                SampleMode::RedDarkness => red_darkness(px.r),
            };
            let glyph = ramp.glyph_for(brightness);
            if settings.skip_blank && glyph == ' ' {
                continue;
            }

            let (dx, dy) = map.to_display(x, y);
            let bright_cell = settings.glow.is_some_and(|g| brightness > g.threshold);
            let glow = match settings.glow {
                Some(g) if bright_cell => g.bright_intensity,
                Some(g) => g.dim_intensity,
                None => 0.0,
            };

            // Halftone dots shrink with the darkness they stand for
            let scale = match settings.sample {
                SampleMode::Mean => 1.0,
                SampleMode::RedDarkness => brightness as f32 / 255.0,
            };

            let cell = (col as u32, row as u32);
            out.push(DrawCommand {
                x: dx,
                y: dy,
                glyph,
                color: gradient_color(settings.deep, settings.bright, brightness),
                glow,
                scale,
                pass: Pass::Base,
                brightness,
                cell,
            });

            if let Some(g) = settings.glow
                && bright_cell
            {
                out.push(DrawCommand {
                    x: dx,
                    y: dy,
                    glyph,
                    color: g.color,
                    glow: 1.0,
                    scale: g.scale,
                    pass: Pass::Glow,
                    brightness,
                    cell,
                });
            }
        }
    }

    out.len() - start
}
