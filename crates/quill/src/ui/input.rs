use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

/// Most suggestions drawn in the popup at once.
const MAX_VISIBLE_SUGGESTIONS: usize = 8;

/// State for the single-line input widget.
pub struct InputState {
    pub textarea: TextArea<'static>,
    /// Index of the currently highlighted completion.
    pub suggestion_selected: usize,
    /// Submitted lines, oldest first.
    sent: Vec<String>,
    /// Position in `sent` while browsing with Up/Down.
    sent_cursor: Option<usize>,
    max_chars: usize,
    prefix: String,
}

impl InputState {
    pub fn new(max_chars: usize, prefix: &str) -> Self {
        Self {
            textarea: new_textarea(),
            suggestion_selected: 0,
            sent: Vec::new(),
            sent_cursor: None,
            max_chars,
            prefix: prefix.to_string(),
        }
    }

    pub fn current_text(&self) -> String {
        self.textarea.lines().join("")
    }

    pub fn is_blank(&self) -> bool {
        self.current_text().trim().is_empty()
    }

    /// Clears the input and remembers the submitted line for Up/Down.
    pub fn take_input(&mut self) -> String {
        let text = self.current_text();
        if !text.trim().is_empty() {
            self.sent.push(text.clone());
        }
        self.set_text("");
        self.sent_cursor = None;
        text
    }

    /// Discards the line without adding it to the history.
    pub fn clear(&mut self) {
        self.set_text("");
        self.sent_cursor = None;
    }

    /// Inserts typed text, keeping the line within the character limit.
    pub fn insert(&mut self, text: &str) {
        let room = self
            .max_chars
            .saturating_sub(self.current_text().chars().count());
        let accepted: String = text
            .chars()
            .filter(|c| !c.is_control())
            .take(room)
            .collect();
        if !accepted.is_empty() {
            self.textarea.insert_str(accepted);
            self.suggestion_selected = 0;
        }
    }

    /// Replaces the word being typed with `suggestion`, followed by a space.
    pub fn apply_suggestion(&mut self, suggestion: &str) {
        let text = self.current_text();
        let base = match text.rfind(' ') {
            Some(i) => &text[..=i],
            None => self.prefix.as_str(),
        };
        let completed: String = format!("{base}{suggestion} ")
            .chars()
            .take(self.max_chars)
            .collect();
        self.set_text(&completed);
    }

    pub fn suggestion_up(&mut self, count: usize) {
        if count > 0 {
            self.suggestion_selected = self.suggestion_selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    pub fn suggestion_down(&mut self, count: usize) {
        if count > 0 {
            self.suggestion_selected = (self.suggestion_selected + 1) % count;
        }
    }

    /// Steps back through submitted lines.
    pub fn history_older(&mut self) {
        let index = match self.sent_cursor {
            None if self.sent.is_empty() => return,
            None => self.sent.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.sent_cursor = Some(index);
        let line = self.sent[index].clone();
        self.set_text(&line);
    }

    /// Steps forward; past the newest line the input is emptied.
    pub fn history_newer(&mut self) {
        let Some(index) = self.sent_cursor else {
            return;
        };
        if index + 1 < self.sent.len() {
            self.sent_cursor = Some(index + 1);
            let line = self.sent[index + 1].clone();
            self.set_text(&line);
        } else {
            self.sent_cursor = None;
            self.set_text("");
        }
    }

    fn set_text(&mut self, text: &str) {
        self.textarea = new_textarea();
        self.textarea.insert_str(text);
        self.textarea.move_cursor(CursorMove::End);
        self.suggestion_selected = 0;
    }
}

fn new_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message (Enter to send, Tab to complete) "),
    );
    textarea.set_cursor_line_style(Style::default());
    textarea.set_style(Style::default().fg(Color::White));
    textarea
}

/// Draws the input line and, above it, the completions with their summaries.
pub fn render(frame: &mut Frame, area: Rect, state: &InputState, suggestions: &[(String, String)]) {
    frame.render_widget(&state.textarea, area);

    if suggestions.is_empty() {
        return;
    }

    // Keep the selection inside the visible window.
    let first = state
        .suggestion_selected
        .saturating_sub(MAX_VISIBLE_SUGGESTIONS - 1);
    let visible = &suggestions[first..suggestions.len().min(first + MAX_VISIBLE_SUGGESTIONS)];

    let popup_height = visible.len() as u16 + 2;
    let popup_y = area.y.saturating_sub(popup_height);
    let popup_area = Rect::new(area.x, popup_y, area.width.min(60), popup_height);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(i, (name, summary))| {
            let style = if first + i == state.suggestion_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{name:<12}"), style),
                Span::styled(summary.clone(), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(popup, popup_area);
}
