//! Matrix rain background.
//!
//! Each column is a trail of glyphs falling at its own speed. The leading
//! glyph is the brightest; brightness fades along the trail. When the
//! trailing edge passes the bottom of the display the column is recycled to
//! a random start above the top with a new random speed. Glyphs flicker by
//! mutating with a small per-frame probability.

use rand::Rng;

use crate::ascii::{lerp_color, DrawCommand, Pass, Rgba, AMBER, DEEP_ORANGE};
use crate::effects::clamp_probability;

/// Glyphs used for falling code.
pub const CODE_GLYPHS: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^&*(){}[]<>?/\\|~`";

/// Colour of the leading glyph.
pub const HEAD_COLOR: Rgba = Rgba::rgb(255, 180, 0);

/// Rain layout and behaviour, in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct RainConfig {
    /// Horizontal distance between columns
    pub column_width: f32,
    /// Vertical distance between glyphs in a trail
    pub spacing: f32,
    pub trail_min: usize,
    pub trail_max: usize,
    /// Fall speed range, display units per frame
    pub speed_min: f32,
    pub speed_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Per-glyph, per-frame chance of swapping to a new random glyph
    pub mutation_probability: f64,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            column_width: 2.0,
            spacing: 1.0,
            trail_min: 10,
            trail_max: 30,
            speed_min: 0.1,
            speed_max: 0.4,
            opacity_min: 0.3,
            opacity_max: 0.8,
            mutation_probability: 0.02,
        }
    }
}

/// One glyph in a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailGlyph {
    pub glyph: char,
    /// 1.0 at the head, fading toward 0.0 at the tail
    pub brightness: f32,
}

/// A single falling column.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixColumn {
    pub x: f32,
    /// Y of the leading glyph; the trail extends upward from here
    pub head_y: f32,
    pub speed: f32,
    pub opacity: f32,
    pub trail: Vec<TrailGlyph>,
}

impl MatrixColumn {
    /// Y of the last glyph in the trail.
    pub fn tail_y(&self, spacing: f32) -> f32 {
        self.head_y - self.trail.len().saturating_sub(1) as f32 * spacing
    }
}

/// All rain columns for one display.
#[derive(Debug, Clone)]
pub struct MatrixRain {
    config: RainConfig,
    glyphs: Vec<char>,
    columns: Vec<MatrixColumn>,
    width: f32,
    height: f32,
}

fn random_glyph<R: Rng + ?Sized>(glyphs: &[char], rng: &mut R) -> char {
    glyphs[rng.gen_range(0..glyphs.len())]
}

fn range_or_min<R: Rng + ?Sized>(min: f32, max: f32, rng: &mut R) -> f32 {
    if max > min { rng.gen_range(min..max) } else { min }
}

impl MatrixRain {
    /// Lay out columns for a `width` x `height` display.
    pub fn new<R: Rng + ?Sized>(width: f32, height: f32, config: RainConfig, rng: &mut R) -> Self {
        let mut rain = Self {
            config,
            glyphs: CODE_GLYPHS.chars().collect(),
            columns: Vec::new(),
            width,
            height,
        };
        rain.layout(rng);
        rain
    }

    pub fn columns(&self) -> &[MatrixColumn] {
        &self.columns
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Re-derive the column layout for a new display size.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) {
        self.width = width;
        self.height = height;
        self.layout(rng);
        log::debug!("Rain layout: {} columns for {}x{}", self.columns.len(), width, height);
    }

    fn layout<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.columns.clear();
        if self.width <= 0.0 || self.height <= 0.0 || self.config.column_width <= 0.0 {
            return;
        }

        let count = (self.width / self.config.column_width).ceil() as usize;
        let trail_max = self.config.trail_max.max(self.config.trail_min).max(1);
        let trail_min = self.config.trail_min.clamp(1, trail_max);

        for i in 0..count {
            let len = rng.gen_range(trail_min..=trail_max);
            let trail = (0..len)
                .map(|j| TrailGlyph {
                    glyph: random_glyph(&self.glyphs, rng),
                    brightness: 1.0 - j as f32 / len as f32,
                })
                .collect();
            self.columns.push(MatrixColumn {
                x: i as f32 * self.config.column_width,
                // Start spread over the screen so the first frame is not empty
                head_y: rng.gen_range(-self.height..self.height),
                speed: range_or_min(self.config.speed_min, self.config.speed_max, rng),
                opacity: range_or_min(self.config.opacity_min, self.config.opacity_max, rng),
                trail,
            });
        }
    }

    /// Advance every column by one frame.
    ///
    /// A column whose trailing edge has passed the bottom is recycled in the
    /// same call, so no column is ever left fully below the display.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let p = clamp_probability(self.config.mutation_probability);
        let spacing = self.config.spacing;

        for column in &mut self.columns {
            column.head_y += column.speed;

            if column.tail_y(spacing) > self.height {
                column.head_y = rng.gen_range(-self.height..0.0);
                column.speed = range_or_min(self.config.speed_min, self.config.speed_max, rng);
            }

            for g in &mut column.trail {
                if rng.gen_bool(p) {
                    g.glyph = random_glyph(&self.glyphs, rng);
                }
            }
        }
    }

    /// Draw commands for every visible glyph.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        self.draw_into(&mut out);
        out
    }

    /// Append draw commands for every visible glyph to `out`.
    pub fn draw_into(&self, out: &mut Vec<DrawCommand>) {
        let spacing = self.config.spacing;
        for column in &self.columns {
            for (i, g) in column.trail.iter().enumerate() {
                let y = column.head_y - i as f32 * spacing;
                if y < 0.0 || y >= self.height {
                    continue;
                }

                let (color, glow) = if i == 0 {
                    (HEAD_COLOR, 1.0)
                } else {
                    let alpha = (column.opacity * g.brightness * 255.0).round() as u8;
                    (lerp_color(DEEP_ORANGE, AMBER, g.brightness).with_alpha(alpha), 0.25)
                };

                out.push(DrawCommand {
                    x: column.x,
                    y,
                    glyph: g.glyph,
                    color,
                    glow,
                    scale: 1.0,
                    pass: Pass::Base,
                    brightness: (g.brightness * 255.0) as u8,
                    cell: (0, i as u32),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn test_column_count_from_width() {
        let rain = MatrixRain::new(81.0, 24.0, RainConfig::default(), &mut rng());
        assert_eq!(rain.columns().len(), 41);
    }

    #[test]
    fn test_trail_brightness_decreases() {
        let rain = MatrixRain::new(20.0, 24.0, RainConfig::default(), &mut rng());
        for col in rain.columns() {
            assert_eq!(col.trail[0].brightness, 1.0);
            for pair in col.trail.windows(2) {
                assert!(pair[1].brightness < pair[0].brightness);
            }
        }
    }

    #[test]
    fn test_zero_mutation_keeps_glyphs() {
        let mut r = rng();
        let config = RainConfig {
            mutation_probability: 0.0,
            ..RainConfig::default()
        };
        let mut rain = MatrixRain::new(10.0, 1000.0, config, &mut r);
        let before: Vec<Vec<char>> = rain
            .columns()
            .iter()
            .map(|c| c.trail.iter().map(|g| g.glyph).collect())
            .collect();
        rain.update(&mut r);
        let after: Vec<Vec<char>> = rain
            .columns()
            .iter()
            .map(|c| c.trail.iter().map(|g| g.glyph).collect())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_default_speeds_are_fractions_of_a_cell() {
        let config = RainConfig::default();
        assert_eq!((config.speed_min, config.speed_max), (0.1, 0.4));
        assert_eq!(config.mutation_probability, 0.02);
        let rain = MatrixRain::new(40.0, 20.0, config, &mut rng());
        assert!(rain.columns().iter().all(|c| (0.1..0.4).contains(&c.speed)));
    }

    #[test]
    fn test_nan_mutation_probability_keeps_glyphs() {
        let mut r = rng();
        let config = RainConfig {
            mutation_probability: f64::NAN,
            ..RainConfig::default()
        };
        let mut rain = MatrixRain::new(10.0, 1000.0, config, &mut r);
        let before: Vec<char> = rain.columns()[0].trail.iter().map(|g| g.glyph).collect();
        for _ in 0..10 {
            rain.update(&mut r);
        }
        let after: Vec<char> = rain.columns()[0].trail.iter().map(|g| g.glyph).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_full_mutation_changes_glyphs_eventually() {
        let mut r = rng();
        let config = RainConfig {
            mutation_probability: 1.0,
            ..RainConfig::default()
        };
        let mut rain = MatrixRain::new(2.0, 1000.0, config, &mut r);
        let before: Vec<char> = rain.columns()[0].trail.iter().map(|g| g.glyph).collect();
        rain.update(&mut r);
        let after: Vec<char> = rain.columns()[0].trail.iter().map(|g| g.glyph).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_resize_rederives_columns() {
        let mut r = rng();
        let mut rain = MatrixRain::new(10.0, 10.0, RainConfig::default(), &mut r);
        assert_eq!(rain.columns().len(), 5);
        rain.resize(40.0, 10.0, &mut r);
        assert_eq!(rain.columns().len(), 20);
        rain.resize(0.0, 10.0, &mut r);
        assert!(rain.columns().is_empty());
    }

    #[test]
    fn test_draw_commands_only_visible() {
        let mut r = rng();
        let mut rain = MatrixRain::new(10.0, 24.0, RainConfig::default(), &mut r);
        for _ in 0..50 {
            rain.update(&mut r);
            for cmd in rain.draw_commands() {
                assert!(cmd.y >= 0.0 && cmd.y < 24.0);
            }
        }
    }

    #[test]
    fn test_head_is_brightest_color() {
        let mut rain = MatrixRain::new(2.0, 24.0, RainConfig::default(), &mut rng());
        rain.columns[0].head_y = 10.0;
        let cmds = rain.draw_commands();
        let head = cmds.iter().find(|c| c.y == 10.0).unwrap();
        assert_eq!(head.color, HEAD_COLOR);
        assert_eq!(head.glow, 1.0);
    }

    #[test]
    fn test_code_glyphs_has_backslash() {
        assert!(CODE_GLYPHS.contains('\\'));
    }
}
