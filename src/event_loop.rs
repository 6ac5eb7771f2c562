//! Async render loop.
//!
//! One task drives everything: a frame interval, the crossterm event
//! stream, and non-blocking hand-offs to the detection service. Detection
//! results arrive whenever they are ready; each frame draws with whatever
//! result is latest.

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use std::path::PathBuf;
use std::time::Duration;

use crate::compositor::{AnimationState, Compositor};
use crate::face::{DetectionService, FaceDetector};
use crate::input::{handle_key_event, KeyAction};
use crate::renderer::render_canvas;
use crate::source::FrameSource;
use crate::terminal::{save_snapshot, CellCanvas};

/// Settings for the interactive loop.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub fps: u32,
    /// Where `s` writes snapshots
    pub snapshot_dir: PathBuf,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl LoopOptions {
    /// Time between frames; at least 1 ms.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis((1000 / self.fps.max(1) as u64).max(1))
    }
}

/// Compose one frame onto `canvas`, handing the source frame to the
/// detector if it is idle.
pub fn step<D: FaceDetector>(
    source: &mut dyn FrameSource,
    source_name: &str,
    service: &DetectionService<D>,
    compositor: &Compositor,
    state: &mut AnimationState,
    canvas: &mut CellCanvas,
) {
    let detections = service.latest();
    let frame = source.poll_frame(&state.clock);

    if let Some(buffer) = frame
        && !service.is_in_flight()
    {
        service.request(buffer.clone());
    }

    let composed = compositor.render_frame(state, frame, &detections, source_name);
    compositor.paint(canvas, &composed, state);
}

/// Async main loop using tokio::select! for concurrent handling.
///
/// This loop handles two concurrent concerns:
/// 1. Terminal events (keyboard input, resize) via crossterm EventStream
/// 2. Frame rendering on a fixed interval (missed ticks are skipped)
///
/// The loop exits on a quit key or when the event stream ends.
pub async fn run<D: FaceDetector>(
    source: &mut dyn FrameSource,
    service: &DetectionService<D>,
    compositor: &mut Compositor,
    state: &mut AnimationState,
    options: &LoopOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut stdout = std::io::stdout();
    let mut event_stream = EventStream::new();
    let source_name = source.name().to_string();

    let mut frame_interval = tokio::time::interval(options.frame_interval());
    frame_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let (cols, rows) = state.size();
    let mut canvas = CellCanvas::new(cols, rows);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match handle_key_event(key_event, compositor) {
                            KeyAction::Quit => break,
                            KeyAction::Snapshot => {
                                match save_snapshot(&canvas, &options.snapshot_dir, state.clock.frame) {
                                    Ok(files) => log::info!("Saved {} and {}", files.text.display(), files.ansi.display()),
                                    Err(e) => log::warn!("Snapshot failed: {}", e),
                                }
                            }
                            KeyAction::Handled | KeyAction::None => {}
                        }
                    }
                    Some(Ok(Event::Resize(cols, rows))) => {
                        log::debug!("Resize to {}x{}", cols, rows);
                        state.resize(cols, rows);
                        canvas.resize(cols, rows);
                    }
                    Some(Ok(_)) => {
                        // Ignore other events (mouse, focus, etc.)
                    }
                    Some(Err(e)) => {
                        return Err(Box::new(e));
                    }
                    None => break,
                }
            }

            _ = frame_interval.tick() => {
                step(source, &source_name, service, compositor, state, &mut canvas);
                render_canvas(&mut stdout, &canvas)?;
            }
        }
    }

    Ok(())
}

/// Render `frames` frames without a terminal.
///
/// Each frame waits for its detection to finish before drawing the next, so
/// a seeded run produces the same canvas every time.
pub async fn render_headless<D: FaceDetector>(
    source: &mut dyn FrameSource,
    service: &mut DetectionService<D>,
    compositor: &Compositor,
    state: &mut AnimationState,
    frames: u64,
) -> CellCanvas {
    let source_name = source.name().to_string();
    let (cols, rows) = state.size();
    let mut canvas = CellCanvas::new(cols, rows);

    for _ in 0..frames {
        step(source, &source_name, service, compositor, state, &mut canvas);
        if service.is_in_flight() {
            service.wait_for_update().await;
        }
    }

    canvas
}
