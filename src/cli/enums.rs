//! CLI enum types for ramp, render mode, effect preset, and no-face policy options.

use clap::ValueEnum;

use crate::ascii::RampPreset;
use crate::compositor::RenderMode;
use crate::effects::EffectPreset;
use crate::face::NoFacePolicy;

/// Glyph ramp preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Ramp {
    #[default]
    Dense,
    Classic,
    Standard,
    Blocks,
    Minimal,
}

impl From<Ramp> for RampPreset {
    fn from(r: Ramp) -> Self {
        match r {
            Ramp::Dense => RampPreset::Dense,
            Ramp::Classic => RampPreset::Classic,
            Ramp::Standard => RampPreset::Standard,
            Ramp::Blocks => RampPreset::Blocks,
            Ramp::Minimal => RampPreset::Minimal,
        }
    }
}

/// How pixels become glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    #[default]
    Ascii,
    Halftone,
}

impl From<Mode> for RenderMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Ascii => RenderMode::Ascii,
            Mode::Halftone => RenderMode::Halftone,
        }
    }
}

/// Post effect preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Effects {
    None,
    #[default]
    Cyberpunk,
    Calm,
}

impl From<Effects> for EffectPreset {
    fn from(e: Effects) -> Self {
        match e {
            Effects::None => EffectPreset::None,
            Effects::Cyberpunk => EffectPreset::Cyberpunk,
            Effects::Calm => EffectPreset::Calm,
        }
    }
}

/// What to draw when no face is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NoFace {
    #[default]
    WholeFrame,
    Suppress,
}

impl From<NoFace> for NoFacePolicy {
    fn from(n: NoFace) -> Self {
        match n {
            NoFace::WholeFrame => NoFacePolicy::WholeFrame,
            NoFace::Suppress => NoFacePolicy::Suppress,
        }
    }
}
