use anyhow::Result;
use crossterm::event::{EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout};

use quill_core::{ChatConfig, ChatRouter};

use crate::event::Event;
use crate::session::Session;
use crate::tui::Tui;
use crate::ui::{chat, input, status};

/// Main application state.
pub struct App {
    pub session: Session,
    pub input: input::InputState,
    router: ChatRouter<Session>,
    max_shown_messages: usize,
}

impl App {
    pub fn new(config: &ChatConfig, router: ChatRouter<Session>, session: Session) -> Self {
        Self {
            input: input::InputState::new(config.max_input_characters, router.prefix()),
            session,
            router,
            max_shown_messages: config.max_shown_messages,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut crossterm_events = EventStream::new();
        let tick_rate = tokio::time::Duration::from_millis(33); // ~30fps
        let mut tick_interval = tokio::time::interval(tick_rate);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            let event = tokio::select! {
                ct_event = crossterm_events.next() => {
                    match ct_event {
                        Some(Ok(e)) => Event::from(e),
                        Some(Err(e)) => {
                            tracing::warn!("Terminal event error: {e}");
                            continue;
                        }
                        None => break,
                    }
                }
                _ = tick_interval.tick() => Event::Tick,
            };

            self.handle_event(event);

            if self.session.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Completions for whatever is in the input line.
    pub fn suggestions(&self) -> Vec<String> {
        self.router.complete(&self.input.current_text())
    }

    /// Pairs each suggestion with the summary of the command it names.
    fn described(&self, suggestions: Vec<String>) -> Vec<(String, String)> {
        let text = self.input.current_text();
        let typed = text.strip_prefix(self.router.prefix()).unwrap_or(&text);
        let parent = typed.rfind(' ').map_or("", |i| &typed[..i]);
        suggestions
            .into_iter()
            .map(|name| {
                let summary = self
                    .router
                    .find(&format!("{parent} {name}"))
                    .map(|spec| spec.summary().to_string())
                    .unwrap_or_default();
                (name, summary)
            })
            .collect()
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        let chunks = Layout::vertical([
            Constraint::Min(5),    // chat
            Constraint::Length(3), // input
            Constraint::Length(1), // status
        ])
        .split(frame.area());

        let suggestions = self.described(self.suggestions());
        chat::render(
            frame,
            chunks[0],
            &self.session.history,
            self.max_shown_messages,
        );
        input::render(frame, chunks[1], &self.input, &suggestions);
        status::render(frame, chunks[2], &self.session.world, self.router.prefix());
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => self.input.insert(&text),
            Event::Tick => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let suggestions = self.suggestions();
        let has_suggestions = !suggestions.is_empty();

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.should_quit = true;
            }
            KeyCode::Tab if has_suggestions => {
                let index = self.input.suggestion_selected.min(suggestions.len() - 1);
                self.input.apply_suggestion(&suggestions[index]);
            }
            KeyCode::Up if has_suggestions => self.input.suggestion_up(suggestions.len()),
            KeyCode::Down if has_suggestions => self.input.suggestion_down(suggestions.len()),
            KeyCode::Up => self.input.history_older(),
            KeyCode::Down => self.input.history_newer(),
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.input.clear(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert(c.encode_utf8(&mut [0; 4]));
            }
            // Editing and cursor keys only; anything else could add text past the
            // length cap or break the line in two.
            KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => {
                self.input.textarea.input(key);
                self.input.suggestion_selected = 0;
            }
            _ => {}
        }
    }

    /// Hands the input line to the router. Blank lines are dropped.
    fn submit(&mut self) {
        if self.input.is_blank() {
            return;
        }
        let text = self.input.take_input();
        let handled = self.router.receive_line(&text, &mut self.session);
        tracing::debug!("{text:?} -> {handled:?}");
    }
}
