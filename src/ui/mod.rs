// Terminal UI for the deck player, built with ratatui

mod app;
pub mod events;

pub use app::App;
pub use events::{AppEvent, EventHandler};

use anyhow::Result;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Owns the raw-mode terminal. Restores the screen on drop even when the
/// event loop bails out with an error.
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    _cleanup_guard: CleanupGuard,
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = execute!(stdout, cursor::Show);
    }
}

impl TerminalManager {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            _cleanup_guard: CleanupGuard,
        })
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}
