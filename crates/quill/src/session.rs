use quill_core::{ChatConfig, ChatHistory, ChatSink};

use crate::world::World;

/// Everything chat commands can touch: the message log and the world.
#[derive(Debug)]
pub struct Session {
    pub history: ChatHistory,
    pub world: World,
    pub should_quit: bool,
}

impl Session {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            history: ChatHistory::new(config.max_messages),
            world: World::new(config.tile_size),
            should_quit: false,
        }
    }

    /// Greeting shown when the console opens.
    pub fn welcome(&mut self, prefix: &str) {
        self.history.push("&bWelcome &7to the chat system!");
        self.history
            .push(format!("&7Type &b{prefix} &7to list commands."));
    }
}

impl ChatSink for Session {
    fn accept_message(&mut self, text: &str) {
        self.history.accept_message(text);
    }

    fn report_user_mistake(&mut self, text: &str) {
        self.history.report_user_mistake(text);
    }

    fn report_internal_error(&mut self, summary: &str) {
        self.history.report_internal_error(summary);
    }

    fn clear_log(&mut self) {
        self.history.clear_log();
    }
}
