//! Configuration file handling for ascii-rain.
//!
//! Loads configuration from `<config dir>/ascii-rain/config.toml` or a custom
//! path. Every field has a default, so a missing file or a partial file is
//! fine; command-line flags are applied on top afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ascii::{GlyphRamp, RampOrder, RampPreset};
use crate::compositor::{Background, RenderMode};
use crate::effects::{EffectPreset, EffectSettings};
use crate::face::NoFacePolicy;
use crate::rain::RainConfig;
use crate::stripes::DEFAULT_STRIPE_COUNT;

/// Configuration file structure for ascii-rain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ascii: AsciiConfig,
    #[serde(default)]
    pub rain: RainSection,
    #[serde(default)]
    pub stripes: StripesSection,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub face: FaceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Image to render; the procedural face is used when unset
    pub image: Option<PathBuf>,
    /// Size of the procedural frame, and the cap for loaded images
    pub width: u32,
    pub height: u32,
    /// RNG seed for rain, effects and procedural grain
    pub seed: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            image: None,
            width: 640,
            height: 480,
            seed: 0x5eed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    /// ascii or halftone
    pub mode: String,
    /// Preset name: dense, classic, standard, blocks, minimal
    pub ramp: String,
    /// Custom glyphs, overriding `ramp`
    pub glyphs: Option<String>,
    /// Custom glyphs run sparse-to-dense instead of dense-to-sparse
    pub sparse_first: bool,
    /// Sampling stride in source pixels; fitted to the display when unset
    pub stride: Option<u32>,
    pub mirror: bool,
    #[serde(default = "default_true")]
    pub skip_blank: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default().name().to_string(),
            ramp: RampPreset::default().name().to_string(),
            glyphs: None,
            sparse_first: false,
            stride: None,
            mirror: false,
            skip_blank: true,
        }
    }
}

impl AsciiConfig {
    pub fn mode(&self) -> Result<RenderMode, ConfigError> {
        RenderMode::from_name(&self.mode).ok_or_else(|| ConfigError::InvalidValue {
            key: "ascii.mode",
            value: self.mode.clone(),
        })
    }

    /// Resolve the configured ramp and the name to show for it.
    pub fn ramp(&self) -> Result<(GlyphRamp, String), ConfigError> {
        if let Some(glyphs) = &self.glyphs {
            let order = if self.sparse_first {
                RampOrder::SparseToDense
            } else {
                RampOrder::DenseToSparse
            };
            let ramp = GlyphRamp::new(glyphs, order).map_err(|_| ConfigError::InvalidValue {
                key: "ascii.glyphs",
                value: glyphs.clone(),
            })?;
            return Ok((ramp, "custom".to_string()));
        }
        let preset = RampPreset::from_name(&self.ramp).ok_or_else(|| ConfigError::InvalidValue {
            key: "ascii.ramp",
            value: self.ramp.clone(),
        })?;
        Ok((preset.ramp(), preset.name().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub column_width: f32,
    pub trail_min: usize,
    pub trail_max: usize,
    pub speed_min: f32,
    pub speed_max: f32,
    pub mutation_probability: f64,
}

impl Default for RainSection {
    fn default() -> Self {
        let rain = RainConfig::default();
        Self {
            enabled: true,
            column_width: rain.column_width,
            trail_min: rain.trail_min,
            trail_max: rain.trail_max,
            speed_min: rain.speed_min,
            speed_max: rain.speed_max,
            mutation_probability: rain.mutation_probability,
        }
    }
}

impl RainSection {
    pub fn to_rain_config(&self) -> RainConfig {
        RainConfig {
            column_width: self.column_width,
            trail_min: self.trail_min,
            trail_max: self.trail_max,
            speed_min: self.speed_min,
            speed_max: self.speed_max,
            mutation_probability: self.mutation_probability,
            ..RainConfig::default()
        }
    }
}

/// Drifting stripe background; replaces the rain when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripesSection {
    pub enabled: bool,
    pub count: usize,
}

impl Default for StripesSection {
    fn default() -> Self {
        Self {
            enabled: false,
            count: DEFAULT_STRIPE_COUNT,
        }
    }
}

/// Effect preset plus individual overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// none, cyberpunk or calm
    pub preset: String,
    pub glow: Option<bool>,
    pub wave_amplitude: Option<f32>,
    pub glitch_probability: Option<f64>,
    pub flicker_probability: Option<f64>,
    pub motion_boost: Option<bool>,
    pub scanline: Option<bool>,
    pub vignette: Option<f32>,
    pub border: Option<bool>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            preset: EffectPreset::default().to_string(),
            glow: None,
            wave_amplitude: None,
            glitch_probability: None,
            flicker_probability: None,
            motion_boost: None,
            scanline: None,
            vignette: None,
            border: None,
        }
    }
}

impl EffectsConfig {
    /// Preset settings with the overrides applied.
    pub fn settings(&self) -> Result<EffectSettings, ConfigError> {
        let preset = EffectPreset::from_str(&self.preset).ok_or_else(|| ConfigError::InvalidValue {
            key: "effects.preset",
            value: self.preset.clone(),
        })?;
        let mut s = preset.settings();
        if let Some(v) = self.glow {
            s.glow = v;
        }
        if let Some(v) = self.wave_amplitude {
            s.wave_amplitude = v;
        }
        if let Some(v) = self.glitch_probability {
            s.glitch_probability = v;
        }
        if let Some(v) = self.flicker_probability {
            s.flicker_probability = v;
        }
        if let Some(v) = self.motion_boost {
            s.motion_boost = v;
        }
        if let Some(v) = self.scanline {
            s.scanline = v;
        }
        if let Some(v) = self.vignette {
            s.vignette = v;
        }
        if let Some(v) = self.border {
            s.border = v;
        }
        Ok(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// whole-frame or suppress
    pub no_face: String,
    /// Padding around keypoint bounds, in source pixels
    pub padding: i32,
    /// Fixed face boxes `[x, y, width, height]` reported for every frame
    pub boxes: Vec<[i32; 4]>,
    /// Use the procedural face's own oval as the detection
    pub track_procedural: bool,
    /// Detections slower than this are dropped
    pub timeout_ms: u64,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            no_face: NoFacePolicy::default().name().to_string(),
            padding: 20,
            boxes: Vec::new(),
            track_procedural: true,
            timeout_ms: 500,
        }
    }
}

impl FaceConfig {
    pub fn policy(&self) -> Result<NoFacePolicy, ConfigError> {
        match self.no_face.to_lowercase().as_str() {
            "whole-frame" | "whole_frame" | "wholeframe" => Ok(NoFacePolicy::WholeFrame),
            "suppress" | "none" => Ok(NoFacePolicy::Suppress),
            _ => Err(ConfigError::InvalidValue {
                key: "face.no_face",
                value: self.no_face.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub status_bar: bool,
    pub fps: u32,
    /// Directory snapshots are written to
    pub snapshot_dir: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_bar: true,
            fps: 30,
            snapshot_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Log file; `<cache dir>/ascii-rain/ascii-rain.log` when unset
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("ascii-rain")
                .join("ascii-rain.log")
        })
    }
}

fn default_true() -> bool {
    true
}

fn check_probability(key: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: p.to_string(),
        })
    }
}

fn check_finite(key: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: v.to_string(),
        })
    }
}

impl Config {
    /// Background drawn behind the glyphs; stripes win over rain.
    pub fn background(&self) -> Background {
        if self.stripes.enabled {
            Background::Stripes
        } else if self.rain.enabled {
            Background::Rain
        } else {
            Background::None
        }
    }

    /// Reject numeric values the renderer cannot use: probabilities
    /// outside 0.0-1.0 (NaN included) and non-finite sizes or speeds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("rain.mutation_probability", self.rain.mutation_probability)?;
        check_finite("rain.column_width", self.rain.column_width)?;
        check_finite("rain.speed_min", self.rain.speed_min)?;
        check_finite("rain.speed_max", self.rain.speed_max)?;

        let effects = &self.effects;
        if let Some(p) = effects.glitch_probability {
            check_probability("effects.glitch_probability", p)?;
        }
        if let Some(p) = effects.flicker_probability {
            check_probability("effects.flicker_probability", p)?;
        }
        if let Some(v) = effects.wave_amplitude {
            check_finite("effects.wave_amplitude", v)?;
        }
        if let Some(v) = effects.vignette {
            check_finite("effects.vignette", v)?;
        }
        Ok(())
    }

    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed or holds
    /// values [`Config::validate`] rejects.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            config.validate()?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the default configuration to `path`, creating parent
    /// directories. Refuses to overwrite an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content = format!(
            "# ascii-rain configuration\n# Missing keys fall back to built-in defaults.\n\n{}",
            Config::default().to_toml()?
        );
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-rain").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-rain/config.toml")
        })
}
