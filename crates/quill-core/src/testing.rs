use crate::sink::ChatSink;

/// Sink that keeps every call, split by kind.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<String>,
    pub mistakes: Vec<String>,
    pub internal_errors: Vec<String>,
    pub clears: usize,
}

impl ChatSink for RecordingSink {
    fn accept_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn report_user_mistake(&mut self, text: &str) {
        self.mistakes.push(text.to_string());
    }

    fn report_internal_error(&mut self, summary: &str) {
        self.internal_errors.push(summary.to_string());
    }

    fn clear_log(&mut self) {
        self.clears += 1;
    }
}
