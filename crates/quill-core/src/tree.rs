//! Read-only walks over the command tree: the nested name map used by
//! completion, and the generated help text.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::command::CommandPath;
use crate::set::CommandSet;

/// Nested `{name: subtree}` view of a command forest. Leaves have empty subtrees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTree {
    entries: Vec<(String, CommandTree)>,
}

impl CommandTree {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, CommandTree)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandTree> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, subtree)| subtree)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Suggests the next word for `partial`, a command line with the prefix already removed.
    ///
    /// Walks down one level per space-separated word that names a subtree,
    /// splitting on the first space exactly as dispatch does, and stops at the
    /// first word that does not. The names at the level reached that start
    /// with the leftover text are returned in registration order.
    pub fn complete(&self, partial: &str) -> Vec<String> {
        let mut level = self;
        let mut current = partial;

        while let Some((word, rest)) = current.split_once(' ') {
            current = rest;
            match level.get(word) {
                Some(subtree) => level = subtree,
                None => break,
            }
        }

        level
            .names()
            .filter(|name| name.starts_with(current))
            .map(str::to_string)
            .collect()
    }

    /// JSON rendering, objects nested the same way as the tree.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, subtree)| (key.clone(), subtree.to_json()))
                .collect(),
        )
    }
}

impl Serialize for CommandTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, subtree) in &self.entries {
            map.serialize_entry(key, subtree)?;
        }
        map.end()
    }
}

/// Help for one node: `"{path}: {help}"`, followed by its subcommands if it has any.
pub fn node_help<H>(path: &CommandPath, help: &str, children: Option<&CommandSet<H>>) -> String {
    let mut message = format!("{path}: {help}");
    if let Some(set) = children.filter(|set| !set.is_empty()) {
        message.push_str("\n\nAvailable subcommands:");
        push_listing(&mut message, set);
    }
    message
}

/// Help shown for a bare prefix: every top-level command.
pub fn root_help<H>(prefix: &str, root: &CommandSet<H>) -> String {
    if root.is_empty() {
        return "No commands are available.".to_string();
    }
    let mut message = String::from("Available commands:");
    push_listing(&mut message, root);
    message.push_str(&format!("\n\nType {prefix}<command> help for details."));
    message
}

fn push_listing<H>(message: &mut String, set: &CommandSet<H>) {
    for node in set.iter() {
        message.push_str(&format!("\n- {}: {}", node.name(), node.spec().summary()));
    }
}
