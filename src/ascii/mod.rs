//! Brightness-to-glyph mapping.
//!
//! The per-frame pipeline for turning pixels into glyphs:
//!
//! 1. **Brightness** - unweighted RGB mean per sample
//! 2. **Ramp indexing** - linear quantisation into a [`GlyphRamp`]
//! 3. **Colour** - interpolation between a deep and a bright reference colour
//! 4. **Remapping** - source grid cell to display coordinates
//!
//! # Ramps
//!
//! Presets are available via [`RampPreset`]:
//! - `Dense` - long ramp used for the face overlay
//! - `Classic` - 12-level ramp
//! - `Standard` - 10-level ramp
//! - `Blocks` - Unicode block characters
//! - `Minimal` - 4-level clean look
//!
//! [`HALFTONE_RAMP`] is not a preset: it is a sparse-to-dense dot ramp read
//! with [`SampleMode::RedDarkness`] in halftone mode.

mod brightness;
mod dimensions;
mod mapping;
mod palette;
mod ramp;

pub use brightness::{mean_brightness, red_darkness};
pub use dimensions::{fit_stride, CoordinateMap, DisplayRect, Region};
pub use mapping::{
    map_region_into, map_region_to_glyphs, mapped_cell_count, DrawCommand, GlowSettings,
    MapperSettings, Pass, SampleMode,
};
pub use palette::{
    gradient_color, lerp_color, Rgba, AMBER, DEEP_ORANGE, GLOW_ORANGE, HALFTONE_INK,
    HALFTONE_PAPER, ORANGE,
};
pub use ramp::{
    GlyphRamp, RampError, RampOrder, RampPreset, BLOCKS_RAMP, CLASSIC_RAMP, DENSE_RAMP,
    HALFTONE_RAMP, MINIMAL_RAMP, STANDARD_RAMP,
};
