use crossterm::event::{Event as CrosstermEvent, KeyEvent};

/// Unified event type for the console.
#[derive(Debug)]
pub enum Event {
    /// Terminal key press.
    Key(KeyEvent),
    /// Pasted text, inserted into the input line.
    Paste(String),
    /// Render tick (30fps). Also stands in for terminal events we ignore.
    Tick,
}

impl From<CrosstermEvent> for Event {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            CrosstermEvent::Key(key) => Event::Key(key),
            CrosstermEvent::Paste(text) => Event::Paste(text),
            _ => Event::Tick, // Resize, focus and mouse events only need a redraw
        }
    }
}
