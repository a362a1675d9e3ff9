use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

/// Owns the terminal while the console is on screen; dropping it gives the
/// terminal back, on error paths too.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        // Panics caught inside commands would otherwise print over the chat.
        std::panic::set_hook(Box::new(|info| tracing::error!("Panic: {info}")));

        Ok(Self { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Back to the default hook so a panic after this point reaches stderr.
        drop(std::panic::take_hook());
        if let Err(e) = disable_raw_mode()
            .and_then(|()| execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste))
        {
            tracing::warn!("Failed to restore the terminal: {e}");
        }
    }
}
