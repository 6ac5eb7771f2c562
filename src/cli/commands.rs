//! Subcommand handlers and session assembly.

use std::path::Path;
use std::time::Duration;

use super::args::ConfigAction;
use crate::ascii::Region;
use crate::compositor::{AnimationState, Compositor, CompositorSettings};
use crate::config::{default_path, Config, ConfigError};
use crate::event_loop::render_headless;
use crate::face::{DetectionService, FaceDetection, StaticDetector};
use crate::source::{FrameSource, ImageSource, ProceduralFace, SourceError};
use crate::terminal::{save_snapshot, SnapshotFiles};

/// Everything the render loop needs, built from a resolved config.
pub struct Session {
    pub source: Box<dyn FrameSource>,
    pub service: DetectionService<StaticDetector>,
    pub compositor: Compositor,
    pub state: AnimationState,
}

impl Session {
    /// Build a session for a `cols` x `rows` display.
    pub fn build(config: &Config, cols: u16, rows: u16) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        config.validate()?;
        let (source, procedural_face) = build_source(config)?;
        let detector = build_detector(config, procedural_face);
        let service = DetectionService::new(detector)
            .with_timeout(Duration::from_millis(config.face.timeout_ms.max(1)));

        let mut compositor = Compositor::new(compositor_settings(config)?);
        compositor.status_bar_mut().visible = config.ui.status_bar;

        let state = AnimationState::new(cols, rows, config.rain.to_rain_config(), config.source.seed)
            .with_stripes(config.stripes.count);

        Ok(Self {
            source,
            service,
            compositor,
            state,
        })
    }
}

/// Open the configured source. For the procedural face, also returns the
/// detection matching the drawn face.
pub fn build_source(config: &Config) -> Result<(Box<dyn FrameSource>, Option<FaceDetection>), SourceError> {
    let src = &config.source;
    match &src.image {
        Some(path) => {
            let image = ImageSource::open(path, src.width, src.height)?;
            Ok((Box::new(image), None))
        }
        None => {
            let face = ProceduralFace::new(src.width, src.height, src.seed);
            let detection = face.face_detection();
            log::info!("Using procedural face {}x{}", src.width, src.height);
            Ok((Box::new(face), Some(detection)))
        }
    }
}

/// Fixed boxes from config win; otherwise the procedural face tracks itself
/// if allowed; otherwise no faces are ever reported.
pub fn build_detector(config: &Config, procedural_face: Option<FaceDetection>) -> StaticDetector {
    if !config.face.boxes.is_empty() {
        let regions: Vec<Region> = config
            .face
            .boxes
            .iter()
            .map(|&[x, y, w, h]| Region::new(x, y, w, h))
            .collect();
        return StaticDetector::from_regions(&regions);
    }
    match procedural_face {
        Some(face) if config.face.track_procedural => StaticDetector::new(vec![face]),
        _ => StaticDetector::default(),
    }
}

/// Compositor settings from a resolved config.
pub fn compositor_settings(config: &Config) -> Result<CompositorSettings, ConfigError> {
    let (ramp, ramp_name) = config.ascii.ramp()?;
    Ok(CompositorSettings {
        ramp,
        ramp_name,
        stride: config.ascii.stride.filter(|&s| s > 0),
        mirror: config.ascii.mirror,
        skip_blank: config.ascii.skip_blank,
        no_face: config.face.policy()?,
        face_padding: config.face.padding,
        background: config.background(),
        mode: config.ascii.mode()?,
        effects: config.effects.settings()?,
    })
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    config_path: Option<&Path>,
) -> Result<(), ConfigError> {
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(default_path);
    match action {
        ConfigAction::Show => {
            if path.exists() {
                println!("# Config file: {} (exists)", path.display());
            } else {
                println!("# Config file: {} (not found, using defaults)", path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            Config::write_default(&path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}

/// Render `frames` frames headless and save the last one.
pub async fn render_to_files(
    config: &Config,
    frames: u64,
    cols: u16,
    rows: u16,
    out: &Path,
) -> Result<SnapshotFiles, Box<dyn std::error::Error + Send + Sync>> {
    let mut session = Session::build(config, cols, rows)?;
    let canvas = render_headless(
        session.source.as_mut(),
        &mut session.service,
        &session.compositor,
        &mut session.state,
        frames,
    )
    .await;
    Ok(save_snapshot(&canvas, out, session.state.clock.frame)?)
}
