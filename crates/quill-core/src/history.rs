use std::collections::VecDeque;

use crate::sink::ChatSink;

/// How serious a logged error is. Each level renders in its own colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Colour-code prefix understood by [`parse_markup`](crate::markup::parse_markup).
    pub fn color_code(self) -> &'static str {
        match self {
            Severity::Info => "&7",
            Severity::Warning => "&e",
            Severity::Error => "&c",
            Severity::Critical => "&4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// `None` for ordinary messages.
    pub severity: Option<Severity>,
    pub text: String,
}

/// In-memory chat log holding at most `capacity` entries; the oldest go first.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    entries: VecDeque<Entry>,
    capacity: usize,
}

impl ChatHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.push_entry(Entry {
            severity: None,
            text: text.into(),
        });
    }

    /// Logs an error line formatted as `"{code} Error: {text}"`.
    pub fn push_error(&mut self, text: &str, severity: Severity) {
        self.push_entry(Entry {
            severity: Some(severity),
            text: format!("{} Error: {text}", severity.color_code()),
        });
    }

    fn push_entry(&mut self, entry: Entry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Removes the most recent entry. Returns false if there was none.
    pub fn clear_last(&mut self) -> bool {
        self.entries.pop_back().is_some()
    }

    /// Removes every entry. Returns false if the log was already empty.
    pub fn clear_all(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Entry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The last `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Entry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(count))
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ChatSink for ChatHistory {
    fn accept_message(&mut self, text: &str) {
        self.push(text);
    }

    fn report_user_mistake(&mut self, text: &str) {
        let text = if text.ends_with('.') {
            text.to_string()
        } else {
            format!("{text}.")
        };
        self.push_error(&text, Severity::Error);
    }

    fn report_internal_error(&mut self, summary: &str) {
        self.push_error(summary, Severity::Critical);
    }

    fn clear_log(&mut self) {
        self.clear_all();
    }
}
