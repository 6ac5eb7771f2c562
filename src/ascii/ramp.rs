//! Glyph ramp definitions for brightness-to-character mapping.

use thiserror::Error;

/// Long face ramp (dense to sparse), used for the detected-face overlay.
pub const DENSE_RAMP: &str = "@#$%&80BMWXYZQOCUPDKHNAGSVRFTLJI?!{}[]()|/<>+=*~^-_:;,.` ";

/// Short classic ramp (dense to sparse).
pub const CLASSIC_RAMP: &str = "@#S%?*+;:,. ";

/// Standard 10-level ramp (dense to sparse).
pub const STANDARD_RAMP: &str = "@%#*+=-:. ";

/// Unicode block ramp (dense to sparse).
pub const BLOCKS_RAMP: &str = "█▓▒░ ";

/// Minimal 4-level ramp (dense to sparse).
pub const MINIMAL_RAMP: &str = "#:. ";

/// Halftone dot ramp (sparse to dense).
pub const HALFTONE_RAMP: &str = " ·•●";

/// Direction in which a ramp's characters are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampOrder {
    /// First character is the densest; bright cells pick earlier characters.
    #[default]
    DenseToSparse,
    /// First character is the sparsest; bright cells pick later characters.
    SparseToDense,
}

/// Errors from ramp construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RampError {
    #[error("glyph ramp must contain at least one character")]
    Empty,
}

/// An ordered, non-empty sequence of glyphs representing a brightness gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
    order: RampOrder,
}

impl GlyphRamp {
    /// Build a ramp from a string of glyphs.
    ///
    /// # Errors
    /// Returns [`RampError::Empty`] if `glyphs` has no characters.
    pub fn new(glyphs: &str, order: RampOrder) -> Result<Self, RampError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(RampError::Empty);
        }
        Ok(Self { glyphs, order })
    }

    /// Number of glyphs in the ramp (always at least 1).
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn order(&self) -> RampOrder {
        self.order
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Map a brightness value to a ramp index.
    ///
    /// The mapping is a linear integer quantisation, identical to
    /// `floor(map(b, 0, 255, len - 1, 0))` for dense-to-sparse ramps. It is
    /// monotonic over 0..=255 and never leaves `[0, len - 1]`.
    #[inline]
    pub fn index_for(&self, brightness: u8) -> usize {
        let levels = self.glyphs.len();
        let b = match self.order {
            RampOrder::DenseToSparse => 255 - brightness,
            RampOrder::SparseToDense => brightness,
        };
        ((b as usize * (levels - 1)) / 255).min(levels - 1)
    }

    /// Select the glyph for a brightness value.
    #[inline]
    pub fn glyph_for(&self, brightness: u8) -> char {
        self.glyphs[self.index_for(brightness)]
    }

    /// Halftone dots, sparse to dense.
    pub fn halftone() -> Self {
        Self {
            glyphs: HALFTONE_RAMP.chars().collect(),
            order: RampOrder::SparseToDense,
        }
    }

    /// Glyph at an arbitrary index, clamped into range.
    pub fn glyph_at(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

/// Named ramp presets selectable from config and the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampPreset {
    #[default]
    Dense,
    Classic,
    Standard,
    Blocks,
    Minimal,
}

impl RampPreset {
    pub fn glyphs(&self) -> &'static str {
        match self {
            RampPreset::Dense => DENSE_RAMP,
            RampPreset::Classic => CLASSIC_RAMP,
            RampPreset::Standard => STANDARD_RAMP,
            RampPreset::Blocks => BLOCKS_RAMP,
            RampPreset::Minimal => MINIMAL_RAMP,
        }
    }

    /// Build the ramp for this preset. Presets are dense-to-sparse.
    pub fn ramp(&self) -> GlyphRamp {
        GlyphRamp {
            glyphs: self.glyphs().chars().collect(),
            order: RampOrder::DenseToSparse,
        }
    }

    /// Cycle to the next preset.
    ///
    /// Order: Dense -> Classic -> Standard -> Blocks -> Minimal -> Dense
    pub fn next(&self) -> Self {
        match self {
            RampPreset::Dense => RampPreset::Classic,
            RampPreset::Classic => RampPreset::Standard,
            RampPreset::Standard => RampPreset::Blocks,
            RampPreset::Blocks => RampPreset::Minimal,
            RampPreset::Minimal => RampPreset::Dense,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RampPreset::Dense => "dense",
            RampPreset::Classic => "classic",
            RampPreset::Standard => "standard",
            RampPreset::Blocks => "blocks",
            RampPreset::Minimal => "minimal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dense" => Some(RampPreset::Dense),
            "classic" => Some(RampPreset::Classic),
            "standard" => Some(RampPreset::Standard),
            "blocks" => Some(RampPreset::Blocks),
            "minimal" => Some(RampPreset::Minimal),
            _ => None,
        }
    }
}
