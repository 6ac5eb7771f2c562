//! ascii-rain library crate.
//!
//! Maps a pixel buffer to glowing glyphs over an animated matrix-rain
//! background, focusing on detected face regions when a detector reports
//! any. This module exposes the components for the binary and for
//! integration testing.

pub mod ascii;
pub mod cli;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod effects;
pub mod event_loop;
pub mod face;
pub mod input;
pub mod rain;
pub mod renderer;
pub mod source;
pub mod stripes;
pub mod terminal;
