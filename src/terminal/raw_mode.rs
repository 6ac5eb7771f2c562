//! Raw mode and alternate screen with panic-safe cleanup.

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while the terminal is in raw mode on the alternate screen
pub(crate) static SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard that puts the terminal into raw mode on the alternate screen and
/// restores it on drop, including when unwinding from a panic.
pub struct ScreenGuard {
    /// Whether this guard is responsible for cleanup
    active: bool,
}

impl ScreenGuard {
    /// Enter raw mode, switch to the alternate screen and hide the cursor.
    ///
    /// # Errors
    /// Returns an error if the terminal refuses raw mode (e.g. not a TTY)
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        SCREEN_ACTIVE.store(true, Ordering::SeqCst);
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            restore();
            return Err(e);
        }

        Ok(Self { active: true })
    }

    /// Restore the terminal now; dropping the guard afterwards is a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            SCREEN_ACTIVE.store(false, Ordering::SeqCst);
            execute!(io::stdout(), Show, LeaveAlternateScreen)?;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            restore();
        }
    }
}

/// Best-effort restore; errors are ignored.
fn restore() {
    SCREEN_ACTIVE.store(false, Ordering::SeqCst);
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Install a panic hook that restores the terminal before the panic message
/// is printed. Installing twice is a no-op.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if SCREEN_ACTIVE.load(Ordering::SeqCst) {
            restore();
        }
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_enter_and_exit() {
        // Raw mode requires a real TTY
        match ScreenGuard::enter() {
            Ok(mut guard) => {
                assert!(SCREEN_ACTIVE.load(Ordering::SeqCst));
                guard.exit().expect("Should leave raw mode");
                assert!(!SCREEN_ACTIVE.load(Ordering::SeqCst));
                drop(guard);
                assert!(!SCREEN_ACTIVE.load(Ordering::SeqCst));
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }

    #[test]
    fn test_panic_hook_installation() {
        install_panic_hook();
        install_panic_hook(); // Second call should be no-op
    }
}
