//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction};
pub use commands::{
    build_detector, build_source, compositor_settings, handle_config_action, render_to_files, Session,
};
pub use enums::{Effects, Mode, NoFace, Ramp};
