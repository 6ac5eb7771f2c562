//! Keyboard input handling.
//!
//! Keys that only change compositor settings are applied here directly;
//! keys that need the event loop (snapshot, quit) are reported back.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::compositor::Compositor;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key changed a setting
    Handled,
    /// Save the current canvas
    Snapshot,
    /// Leave the render loop
    Quit,
    /// Not a key we use
    None,
}

/// Handle a key event.
///
/// Keys:
/// - s: save snapshot
/// - r: cycle glyph ramp
/// - g: toggle glow
/// - m: toggle mirror
/// - t: toggle halftone
/// - h: toggle status line
/// - q, Esc, Ctrl+C: quit
pub fn handle_key_event(event: KeyEvent, compositor: &mut Compositor) -> KeyAction {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    match code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => KeyAction::Quit,
            's' => KeyAction::Snapshot,
            'r' => {
                compositor.cycle_ramp();
                KeyAction::Handled
            }
            'g' => {
                let on = compositor.toggle_glow();
                log::info!("Glow {}", if on { "on" } else { "off" });
                KeyAction::Handled
            }
            'm' => {
                let on = compositor.toggle_mirror();
                log::info!("Mirror {}", if on { "on" } else { "off" });
                KeyAction::Handled
            }
            't' => {
                compositor.toggle_halftone();
                KeyAction::Handled
            }
            'h' => {
                compositor.status_bar_mut().toggle();
                KeyAction::Handled
            }
            _ => KeyAction::None,
        },
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::RenderMode;

    // ==================== Quit Tests ====================

    #[test]
    fn test_q_and_esc_quit() {
        let mut compositor = Compositor::default();
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handle_key_event(q, &mut compositor), KeyAction::Quit);
        assert_eq!(handle_key_event(esc, &mut compositor), KeyAction::Quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut compositor = Compositor::default();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::Quit);
    }

    #[test]
    fn test_other_ctrl_keys_ignored() {
        let mut compositor = Compositor::default();
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::None);
    }

    // ==================== Setting Tests ====================

    #[test]
    fn test_s_requests_snapshot() {
        let mut compositor = Compositor::default();
        let event = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::Snapshot);
    }

    #[test]
    fn test_r_cycles_ramp() {
        let mut compositor = Compositor::default();
        assert_eq!(compositor.settings().ramp_name, "dense");
        let event = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::Handled);
        assert_eq!(compositor.settings().ramp_name, "classic");
    }

    #[test]
    fn test_g_and_m_toggle() {
        let mut compositor = Compositor::default();
        let glow = compositor.settings().effects.glow;
        let mirror = compositor.settings().mirror;

        handle_key_event(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE), &mut compositor);
        handle_key_event(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE), &mut compositor);

        assert_eq!(compositor.settings().effects.glow, !glow);
        assert_eq!(compositor.settings().mirror, !mirror);
    }

    #[test]
    fn test_t_toggles_halftone() {
        let mut compositor = Compositor::default();
        let event = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::Handled);
        assert_eq!(compositor.settings().mode, RenderMode::Halftone);
    }

    #[test]
    fn test_release_ignored() {
        let mut compositor = Compositor::default();
        let mut event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::None);
    }

    #[test]
    fn test_unmapped_key() {
        let mut compositor = Compositor::default();
        let event = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(event, &mut compositor), KeyAction::None);
    }
}
