//! Raw-mode terminal session that restores the shell on drop.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal for the lifetime of the UI.
///
/// Restores the terminal on early `?` returns and normal scope exit; panics
/// are covered by [`install_panic_hook`].
pub struct TerminalGuard {
    terminal: Option<Tui>,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .context("Failed to enter alternate screen")?;
        let terminal =
            Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")?;
        Ok(Self {
            terminal: Some(terminal),
        })
    }

    /// The live terminal; `None` once restored
    pub fn terminal(&mut self) -> Option<&mut Tui> {
        self.terminal.as_mut()
    }

    pub fn is_active(&self) -> bool {
        self.terminal.is_some()
    }

    /// Restore now instead of on drop. Idempotent.
    pub fn restore(&mut self) {
        if self.terminal.take().is_some() {
            Self::cleanup();
        }
    }

    /// Leave raw mode and the alternate screen. Errors are ignored so this is
    /// safe to call from a panic hook.
    pub fn cleanup() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Install panic hook that restores terminal before printing panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        TerminalGuard::cleanup();
        original_hook(panic_info);
    }));
}
