//! Orange/amber palette and colour interpolation.

/// RGBA colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scale the RGB channels by `factor` (clamped to 0.0-1.0), keeping alpha.
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f).round() as u8,
            g: (self.g as f32 * f).round() as u8,
            b: (self.b as f32 * f).round() as u8,
            a: self.a,
        }
    }

    /// Alpha as a 0.0-1.0 fraction.
    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

/// Glow / highlight orange.
pub const ORANGE: Rgba = Rgba::rgb(255, 102, 0);
/// Bright end of the gradient.
pub const AMBER: Rgba = Rgba::rgb(255, 191, 0);
/// Deep end of the gradient.
pub const DEEP_ORANGE: Rgba = Rgba::rgb(255, 68, 0);
/// Glow colour used for the bright-cell second pass.
pub const GLOW_ORANGE: Rgba = Rgba::rgba(255, 150, 0, 150);
/// Paper colour behind halftone dots.
pub const HALFTONE_PAPER: Rgba = Rgba::rgb(249, 93, 45);
/// Halftone dot colour.
pub const HALFTONE_INK: Rgba = Rgba::rgb(0, 0, 0);

#[inline]
fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Linear interpolation between two colours; `t` is clamped to 0.0-1.0.
///
/// `t = 0.0` returns exactly `from`, `t = 1.0` returns exactly `to`.
pub fn lerp_color(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    Rgba {
        r: lerp_channel(from.r, to.r, t),
        g: lerp_channel(from.g, to.g, t),
        b: lerp_channel(from.b, to.b, t),
        a: lerp_channel(from.a, to.a, t),
    }
}

/// Colour for a sampled brightness: `lerp(deep, bright, brightness / 255)`.
#[inline]
pub fn gradient_color(deep: Rgba, bright: Rgba, brightness: u8) -> Rgba {
    lerp_color(deep, bright, brightness as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints_exact() {
        assert_eq!(gradient_color(DEEP_ORANGE, AMBER, 0), DEEP_ORANGE);
        assert_eq!(gradient_color(DEEP_ORANGE, AMBER, 255), AMBER);
    }

    #[test]
    fn test_gradient_midpoint() {
        let mid = lerp_color(Rgba::rgb(0, 0, 0), Rgba::rgb(200, 100, 50), 0.5);
        assert_eq!(mid, Rgba::rgb(100, 50, 25));
    }

    #[test]
    fn test_lerp_clamps_parameter() {
        assert_eq!(lerp_color(DEEP_ORANGE, AMBER, -3.0), DEEP_ORANGE);
        assert_eq!(lerp_color(DEEP_ORANGE, AMBER, 7.5), AMBER);
    }

    #[test]
    fn test_scaled_keeps_alpha() {
        let c = Rgba::rgba(200, 100, 50, 77).scaled(0.5);
        assert_eq!(c, Rgba::rgba(100, 50, 25, 77));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#ff6600"), Some(ORANGE));
        assert_eq!(Rgba::from_hex("ff960096"), Some(GLOW_ORANGE));
        assert_eq!(Rgba::from_hex("#fff"), None);
        assert_eq!(Rgba::from_hex("#gg0000"), None);
    }
}
