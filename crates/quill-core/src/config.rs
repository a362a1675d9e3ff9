use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::validate_prefix;

/// Sizing and formatting limits for the chat, passed explicitly to whoever needs them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatConfig {
    /// Literal that marks a line as a command.
    pub command_prefix: String,
    /// Maximum number of messages kept in the history.
    pub max_messages: usize,
    /// Maximum number of messages drawn at once.
    pub max_shown_messages: usize,
    /// Maximum length of the input line, in characters.
    pub max_input_characters: usize,
    /// Size of one world tile in pixels.
    pub tile_size: i32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            command_prefix: "/".to_string(),
            max_messages: 100,
            max_shown_messages: 20,
            max_input_characters: 100,
            tile_size: 64,
        }
    }
}

/// Load the chat configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ChatConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chat config: {}", path.display()))?;

    let config: ChatConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse chat config: {}", path.display()))?;

    if let Err(e) = validate_prefix(&config.command_prefix) {
        anyhow::bail!("Invalid chat config {}: commandPrefix: {e}", path.display());
    }
    if config.tile_size <= 0 {
        anyhow::bail!(
            "Invalid chat config {}: tileSize must be positive, got {}",
            path.display(),
            config.tile_size
        );
    }

    tracing::info!(
        "Loaded chat config from {} (prefix {:?}, {} messages)",
        path.display(),
        config.command_prefix,
        config.max_messages
    );
    Ok(config)
}
