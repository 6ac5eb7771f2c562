//! Status line drawn along the bottom of the display.

/// What the status line reports for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusInfo<'a> {
    pub source: &'a str,
    pub ramp: &'a str,
    /// Number of faces in use this frame; `None` while detection is pending
    pub faces: Option<usize>,
    pub glow: bool,
    pub mirror: bool,
}

/// Status line for the bottom of the screen.
///
/// Shows: title | source | ramp | faces | glow | mirror
#[derive(Debug, Clone)]
pub struct StatusBar {
    /// Whether the status bar is visible
    pub visible: bool,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub const TITLE: &'static str = "CYBERPUNK ASCII v2.0 | Press S to save";

    /// Create a new status bar with default settings (visible).
    pub fn new() -> Self {
        Self { visible: true }
    }

    /// Create a status bar with the specified visibility.
    pub fn with_visibility(visible: bool) -> Self {
        Self { visible }
    }

    /// Toggle visibility.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Format the status line.
    ///
    /// Format: "TITLE | src:name | ramp:name | face:n | glow:on | mirror:off"
    pub fn format(&self, info: &StatusInfo) -> String {
        let faces = match info.faces {
            None => "face:...".to_string(),
            Some(n) => format!("face:{}", n),
        };
        format!(
            "{} | src:{} | ramp:{} | {} | {} | {}",
            Self::TITLE,
            info.source,
            info.ramp,
            faces,
            if info.glow { "glow:on" } else { "glow:off" },
            if info.mirror { "mirror:on" } else { "mirror:off" },
        )
    }
}
