//! Per-frame animation counters.

/// Time step added to [`FrameClock::time`] on every tick.
pub const TIME_STEP: f32 = 0.01;

/// Accumulated animation time and frame index.
///
/// Owned by the render loop and advanced once per frame; everything that
/// animates (wave, pulse, procedural frames) reads it instead of a global.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameClock {
    /// Animation time, advanced by [`TIME_STEP`] per frame
    pub time: f32,
    /// Number of frames ticked so far
    pub frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next frame.
    pub fn tick(&mut self) {
        self.time += TIME_STEP;
        self.frame += 1;
    }
}
