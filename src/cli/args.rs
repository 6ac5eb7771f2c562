//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Effects, Mode, NoFace, Ramp};
use crate::ascii::RampPreset;
use crate::compositor::RenderMode;
use crate::config::Config;
use crate::effects::EffectPreset;
use crate::face::NoFacePolicy;

/// Terminal app that renders a face as glowing ASCII art over matrix rain
#[derive(Parser, Debug)]
#[command(name = "ascii-rain")]
#[command(version, about = "Face-tracking ASCII art over matrix rain", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image file to render (default: animated procedural face)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Glyph ramp preset
    #[arg(long, short)]
    pub ramp: Option<Ramp>,

    /// Render mode
    #[arg(long, short)]
    pub mode: Option<Mode>,

    /// Custom glyph ramp, densest glyph first
    #[arg(long)]
    pub glyphs: Option<String>,

    /// Sampling stride in source pixels (default: fit to terminal)
    #[arg(long)]
    pub stride: Option<u32>,

    /// Mirror horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Disable glow on bright glyphs
    #[arg(long)]
    pub no_glow: bool,

    /// Disable the matrix rain background
    #[arg(long)]
    pub no_rain: bool,

    /// Drifting stripe background instead of the rain
    #[arg(long)]
    pub stripes: bool,

    /// Post effect preset
    #[arg(long, short)]
    pub effects: Option<Effects>,

    /// Chance per glyph of a random flicker glyph (0.0-1.0)
    #[arg(long, value_parser = parse_probability)]
    pub flicker: Option<f64>,

    /// Highlight cells that changed since the last frame
    #[arg(long)]
    pub motion_boost: bool,

    /// What to draw when no face is detected
    #[arg(long)]
    pub no_face: Option<NoFace>,

    /// Fixed face box as x,y,width,height (repeatable)
    #[arg(long = "face-box", value_parser = parse_face_box)]
    pub face_boxes: Vec<[i32; 4]>,

    /// RNG seed for reproducible animation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Hide status bar
    #[arg(long)]
    pub no_status: bool,

    /// Directory for snapshots
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Render frames without a terminal and save the last one
    Render {
        /// Number of frames to render
        #[arg(long, default_value = "60")]
        frames: u64,
        /// Canvas width in cells
        #[arg(long, default_value = "80")]
        cols: u16,
        /// Canvas height in cells
        #[arg(long, default_value = "24")]
        rows: u16,
        /// Output directory
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Parse a probability, clamping into 0.0-1.0. NaN is rejected.
fn parse_probability(s: &str) -> Result<f64, String> {
    let p: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if p.is_nan() {
        return Err("probability must be a number between 0.0 and 1.0".to_string());
    }
    Ok(p.clamp(0.0, 1.0))
}

/// Parse `x,y,width,height`.
fn parse_face_box(s: &str) -> Result<[i32; 4], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x,y,width,height, got '{}'", s));
    }
    let mut out = [0i32; 4];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not an integer", part))?;
    }
    if out[2] <= 0 || out[3] <= 0 {
        return Err("width and height must be positive".to_string());
    }
    Ok(out)
}

impl Args {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(image) = &self.image {
            config.source.image = Some(image.clone());
        }
        if let Some(seed) = self.seed {
            config.source.seed = seed;
        }
        if let Some(ramp) = self.ramp {
            config.ascii.ramp = RampPreset::from(ramp).name().to_string();
            config.ascii.glyphs = None;
        }
        if let Some(mode) = self.mode {
            config.ascii.mode = RenderMode::from(mode).name().to_string();
        }
        if let Some(glyphs) = &self.glyphs {
            config.ascii.glyphs = Some(glyphs.clone());
            config.ascii.sparse_first = false;
        }
        if self.stride.is_some() {
            config.ascii.stride = self.stride;
        }
        if self.mirror {
            config.ascii.mirror = true;
        }
        if self.no_rain {
            config.rain.enabled = false;
        }
        if self.stripes {
            config.stripes.enabled = true;
        }
        if let Some(effects) = self.effects {
            config.effects.preset = EffectPreset::from(effects).to_string();
        }
        if self.no_glow {
            config.effects.glow = Some(false);
        }
        if let Some(p) = self.flicker {
            config.effects.flicker_probability = Some(p);
        }
        if self.motion_boost {
            config.effects.motion_boost = Some(true);
        }
        if let Some(no_face) = self.no_face {
            config.face.no_face = NoFacePolicy::from(no_face).name().to_string();
        }
        if !self.face_boxes.is_empty() {
            config.face.boxes = self.face_boxes.clone();
        }
        if let Some(fps) = self.fps {
            config.ui.fps = fps;
        }
        if self.no_status {
            config.ui.status_bar = false;
        }
        if let Some(dir) = &self.snapshot_dir {
            config.ui.snapshot_dir = dir.clone();
        }
        if let Some(file) = &self.log_file {
            config.log.file = Some(file.clone());
        }
    }
}
