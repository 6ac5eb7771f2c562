//! ascii-rain: face-tracking ASCII art over matrix rain.

use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use ascii_rain::cli::{handle_config_action, render_to_files, Args, Command, Session};
use ascii_rain::config::{Config, LogConfig};
use ascii_rain::event_loop::{self, LoopOptions};
use ascii_rain::terminal::ScreenGuard;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Send `log` output to a file so it never lands on the TUI.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &LogConfig) -> Result<PathBuf, BoxError> {
    let path = config.file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()?;

    Ok(path)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    match &args.command {
        Some(Command::Config { action }) => {
            handle_config_action(action.clone(), &config, args.config.as_deref())?;
            return Ok(());
        }
        Some(Command::Render {
            frames,
            cols,
            rows,
            out,
        }) => {
            init_logging(&config.log)?;
            let files = render_to_files(&config, *frames, *cols, *rows, out).await?;
            println!("Saved {}", files.text.display());
            println!("Saved {}", files.ansi.display());
            return Ok(());
        }
        None => {}
    }

    let log_path = init_logging(&config.log)?;
    log::info!("ascii-rain starting, logging to {}", log_path.display());

    let (cols, rows) = crossterm::terminal::size()?;
    let mut session = Session::build(&config, cols, rows)?;
    let options = LoopOptions {
        fps: config.ui.fps,
        snapshot_dir: config.ui.snapshot_dir.clone(),
    };

    let mut guard = ScreenGuard::enter()?;
    let result = event_loop::run(
        session.source.as_mut(),
        &session.service,
        &mut session.compositor,
        &mut session.state,
        &options,
    )
    .await;
    guard.exit()?;

    log::info!("ascii-rain exiting after {} frames", session.state.clock.frame);
    result
}
