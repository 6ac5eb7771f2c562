//! Animated stripe background for halftone mode.
//!
//! A handful of crossed bars drift, pulse and slowly rotate on a virtual
//! 1200x800 canvas that is stretched over the display. Every bar has a
//! horizontal arm; even bars add a vertical arm on the background layer,
//! and every third bar is painted again with both arms on top of the glyphs.
//!
//! Stripes only paint cell backgrounds ([`Pass::Fill`](crate::ascii::Pass::Fill)), so glyphs drawn
//! under the overlay stay readable.

use std::f32::consts::TAU;

use rand::Rng;

use crate::ascii::{DrawCommand, Rgba};

/// Width of the virtual canvas stripes live on.
pub const VIRTUAL_WIDTH: f32 = 1200.0;
/// Height of the virtual canvas stripes live on.
pub const VIRTUAL_HEIGHT: f32 = 800.0;
/// Number of stripes when none is configured.
pub const DEFAULT_STRIPE_COUNT: usize = 15;

/// How a stripe colour combines with the colour beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Plain alpha blend
    #[default]
    Normal,
    /// `base * top / 255`; darkens
    Multiply,
    /// `255 - (255 - base) * (255 - top) / 255`; lightens
    Screen,
}

impl Blend {
    /// Blend the opaque channels of `top` onto `base`, keeping `top`'s alpha.
    pub fn apply(self, base: Rgba, top: Rgba) -> Rgba {
        let ch = |b: u8, t: u8| -> u8 {
            let (b, t) = (b as u16, t as u16);
            match self {
                Blend::Normal => t as u8,
                Blend::Multiply => (b * t / 255) as u8,
                Blend::Screen => (255 - (255 - b) * (255 - t) / 255) as u8,
            }
        };
        Rgba::rgba(ch(base.r, top.r), ch(base.g, top.g), ch(base.b, top.b), top.a)
    }
}

/// One crossed bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stripe {
    /// Resting centre on the virtual canvas
    pub x: f32,
    pub y: f32,
    /// Length of the horizontal arm
    pub w: f32,
    /// Length of the vertical arm
    pub h: f32,
    /// Resting rotation, radians
    pub angle: f32,
    /// Animation speed per frame
    pub speed: f32,
    pub thickness: f32,
    pub color: Rgba,
    /// Drift amplitude around the resting centre
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Stripe {
    /// A random stripe on the virtual canvas.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..VIRTUAL_WIDTH),
            y: rng.gen_range(0.0..VIRTUAL_HEIGHT),
            w: rng.gen_range(50.0..300.0),
            h: rng.gen_range(100.0..600.0),
            angle: rng.gen_range(0.0..TAU),
            speed: rng.gen_range(0.0005..0.002),
            thickness: rng.gen_range(5.0..40.0),
            color: Rgba::rgba(
                rng.gen_range(220..=255),
                rng.gen_range(80..=150),
                rng.gen_range(30..=80),
                rng.gen_range(100..=180),
            ),
            offset_x: rng.gen_range(-100.0..100.0),
            offset_y: rng.gen_range(-100.0..100.0),
        }
    }

    /// Where the stripe sits at `time` (frames), with its `index` in the field.
    pub fn pose(&self, index: usize, time: f32) -> StripePose {
        let i = index as f32;
        let size = (time * self.speed + i).sin() * 0.3 + 0.7;
        StripePose {
            cx: self.x + (time * self.speed * 0.5 + i * 0.5).sin() * self.offset_x,
            cy: self.y + (time * self.speed * 0.7 + i * 0.3).cos() * self.offset_y,
            angle: self.angle + time * self.speed * 0.1,
            half_w: self.w * size / 2.0,
            half_h: self.h * size / 2.0,
            half_t: self.thickness * size / 2.0,
        }
    }
}

/// A stripe placed for one frame, in virtual canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripePose {
    pub cx: f32,
    pub cy: f32,
    pub angle: f32,
    pub half_w: f32,
    pub half_h: f32,
    pub half_t: f32,
}

impl StripePose {
    /// Whether a virtual point lies on the horizontal arm, and on the
    /// vertical arm.
    pub fn hits(&self, vx: f32, vy: f32) -> (bool, bool) {
        let (sin, cos) = self.angle.sin_cos();
        let (dx, dy) = (vx - self.cx, vy - self.cy);
        // Rotate into the stripe's own frame
        let lx = dx * cos + dy * sin;
        let ly = -dx * sin + dy * cos;
        let horizontal = lx.abs() <= self.half_w && ly.abs() <= self.half_t;
        let vertical = lx.abs() <= self.half_t && ly.abs() <= self.half_h;
        (horizontal, vertical)
    }
}

/// Which pass of the stripe field to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeLayer {
    /// Under the glyphs: every horizontal arm, vertical arms of even stripes
    Background,
    /// Over the glyphs: both arms of every third stripe
    Overlay,
}

/// The full set of stripes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StripeField {
    stripes: Vec<Stripe>,
}

impl StripeField {
    /// `count` random stripes.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        Self {
            stripes: (0..count).map(|_| Stripe::random(rng)).collect(),
        }
    }

    pub fn from_stripes(stripes: Vec<Stripe>) -> Self {
        Self { stripes }
    }

    pub fn stripes(&self) -> &[Stripe] {
        &self.stripes
    }

    /// Append one fill command per covered cell of a `(cols, rows)`
    /// display for the given layer.
    ///
    /// A cell is covered when its centre, stretched onto the virtual canvas,
    /// lies on an arm drawn in that layer. Each stripe's colour is combined
    /// with `paper` using `blend`.
    ///
    /// # Returns
    /// The number of commands appended.
    pub fn draw_into(
        &self,
        layer: StripeLayer,
        time: f32,
        (cols, rows): (u16, u16),
        paper: Rgba,
        blend: Blend,
        out: &mut Vec<DrawCommand>,
    ) -> usize {
        let start = out.len();
        if cols == 0 || rows == 0 {
            return 0;
        }
        let sx = VIRTUAL_WIDTH / cols as f32;
        let sy = VIRTUAL_HEIGHT / rows as f32;

        for (i, stripe) in self.stripes.iter().enumerate() {
            let (horizontal_arm, vertical_arm) = match layer {
                StripeLayer::Background => (true, i % 2 == 0),
                StripeLayer::Overlay if i % 3 == 0 => (true, true),
                StripeLayer::Overlay => continue,
            };
            let pose = stripe.pose(i, time);
            let color = blend.apply(paper, stripe.color);

            for row in 0..rows {
                let vy = (row as f32 + 0.5) * sy;
                for col in 0..cols {
                    let vx = (col as f32 + 0.5) * sx;
                    let (h, v) = pose.hits(vx, vy);
                    if (h && horizontal_arm) || (v && vertical_arm) {
                        out.push(DrawCommand {
                            cell: (col as u32, row as u32),
                            ..DrawCommand::fill(col as f32, row as f32, color)
                        });
                    }
                }
            }
        }
        out.len() - start
    }
}
