use std::collections::HashMap;

use crate::command::{CommandNode, CommandPath};
use crate::error::{CommandError, SetupError};
use crate::sink::ChatSink;
use crate::tree::CommandTree;

/// Where a dispatched line ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// A child command took the line.
    Handled,
    /// The line named no command at all; the owner of the set should print its help.
    OwnerHelp,
}

/// The sibling registry at one level of the command tree.
///
/// Insertion order is kept for help listings and completion; lookups go
/// through a name index.
pub struct CommandSet<H> {
    prefix: Option<String>,
    nodes: Vec<CommandNode<H>>,
    index: HashMap<String, usize>,
}

impl<H> std::fmt::Debug for CommandSet<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSet")
            .field("prefix", &self.prefix)
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl<H> CommandSet<H> {
    /// A set that only accepts lines starting with `prefix`. Used for the root.
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::with_prefix(Some(prefix.into()))
    }

    /// A set every line is addressed to. Used for subcommands.
    pub fn nested() -> Self {
        Self::with_prefix(None)
    }

    fn with_prefix(prefix: Option<String>) -> Self {
        Self {
            prefix,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Adds `node` under its own name. On failure the set is left untouched.
    pub fn register(&mut self, node: CommandNode<H>) -> Result<(), SetupError> {
        let name = node.name();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SetupError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.index.contains_key(name) {
            return Err(SetupError::DuplicateRegistration {
                name: name.to_string(),
            });
        }
        self.index.insert(name.to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Whether `line` is addressed to this set.
    pub fn matches(&self, line: &str) -> bool {
        match &self.prefix {
            None => true,
            Some(prefix) => line.starts_with(prefix.as_str()),
        }
    }

    /// `line` with this set's prefix removed, if it has one.
    pub fn strip_prefix<'l>(&self, line: &'l str) -> &'l str {
        match &self.prefix {
            Some(prefix) => line.strip_prefix(prefix.as_str()).unwrap_or(line),
            None => line,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode<H>> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut CommandNode<H>> {
        self.index.get(name).map(|&i| &mut self.nodes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandNode<H>> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fresh `{name: subtree}` view of this level and everything below it.
    pub fn tree(&self) -> CommandTree {
        CommandTree::from_entries(
            self.nodes
                .iter()
                .map(|node| (node.name().to_string(), node.tree())),
        )
    }

    /// Total number of nodes at this level and below.
    pub fn count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| 1 + node.children().map_or(0, CommandSet::count))
            .sum()
    }

    pub(crate) fn load(&mut self, owner: &CommandPath) {
        for node in &mut self.nodes {
            node.load(owner);
        }
    }
}

impl<H: ChatSink> CommandSet<H> {
    /// Splits `line` on its first space and hands the remainder to the named child.
    pub fn dispatch(
        &mut self,
        line: &str,
        host: &mut H,
        tree: &CommandTree,
    ) -> Result<Routed, CommandError> {
        let (raw_name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let name = self.strip_prefix(raw_name);

        if name.is_empty() {
            return Ok(Routed::OwnerHelp);
        }

        let Some(node) = self.get_mut(name) else {
            return Err(CommandError::UnknownCommand {
                name: name.to_string(),
            });
        };
        node.trigger(rest, host, tree)?;
        Ok(Routed::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;

    fn leaf(name: &str) -> CommandNode<RecordingSink> {
        let reply = format!("{name} ran");
        CommandNode::leaf(name, "", move |cx, arg| {
            cx.reply(&format!("{reply}: {arg}"));
            Ok(())
        })
    }

    #[test]
    fn duplicate_registration_leaves_set_unchanged() {
        let mut set = CommandSet::nested();
        set.register(leaf("echo")).expect("first registration");
        set.register(leaf("clear")).expect("second registration");

        let err = set.register(leaf("echo")).expect_err("duplicate");
        assert_eq!(
            err,
            SetupError::DuplicateRegistration {
                name: "echo".to_string()
            }
        );
        let names: Vec<&str> = set.iter().map(CommandNode::name).collect();
        assert_eq!(names, vec!["echo", "clear"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn names_with_whitespace_are_rejected() {
        let mut set = CommandSet::<RecordingSink>::nested();
        let err = set.register(leaf("two words")).expect_err("invalid");
        assert!(matches!(err, SetupError::InvalidName { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn prefixed_set_only_matches_prefixed_lines() {
        let set = CommandSet::<RecordingSink>::prefixed("/");
        assert!(set.matches("/chat"));
        assert!(set.matches("/"));
        assert!(!set.matches("chat"));
        assert!(!set.matches(""));
    }

    #[test]
    fn nested_set_matches_everything() {
        let set = CommandSet::<RecordingSink>::nested();
        assert!(set.matches(""));
        assert!(set.matches("anything at all"));
    }

    #[test]
    fn dispatch_strips_prefix_and_splits_on_first_space() {
        let mut set = CommandSet::prefixed("/");
        set.register(leaf("echo")).expect("unique");
        let mut sink = RecordingSink::default();

        let routed = set
            .dispatch("/echo a  b c", &mut sink, &CommandTree::default())
            .expect("known command");
        assert_eq!(routed, Routed::Handled);
        assert_eq!(sink.messages, vec!["echo ran: a  b c".to_string()]);
    }

    #[test]
    fn dispatch_without_space_passes_empty_argument() {
        let mut set = CommandSet::nested();
        set.register(leaf("echo")).expect("unique");
        let mut sink = RecordingSink::default();

        set.dispatch("echo", &mut sink, &CommandTree::default())
            .expect("known command");
        assert_eq!(sink.messages, vec!["echo ran: ".to_string()]);
    }

    #[test]
    fn nested_set_does_not_strip_anything() {
        let mut set = CommandSet::nested();
        set.register(leaf("echo")).expect("unique");
        let mut sink = RecordingSink::default();

        let err = set
            .dispatch("/echo", &mut sink, &CommandTree::default())
            .expect_err("slash is part of the name here");
        assert!(matches!(err, CommandError::UnknownCommand { name } if name == "/echo"));
    }

    #[test]
    fn unknown_name_is_reported() {
        let mut set = CommandSet::<RecordingSink>::prefixed("/");
        let mut sink = RecordingSink::default();
        let err = set
            .dispatch("/nope arg", &mut sink, &CommandTree::default())
            .expect_err("unknown");
        assert!(matches!(err, CommandError::UnknownCommand { name } if name == "nope"));
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn empty_name_routes_to_owner_help() {
        let mut set = CommandSet::<RecordingSink>::prefixed("/");
        let mut sink = RecordingSink::default();
        for line in ["/", "/ trailing", ""] {
            let routed = set
                .dispatch(line, &mut sink, &CommandTree::default())
                .expect("empty name is not an error");
            assert_eq!(routed, Routed::OwnerHelp);
        }
    }

    #[test]
    fn tree_keeps_insertion_order() {
        let mut set = CommandSet::nested();
        for name in ["zeta", "alpha", "mid"] {
            set.register(leaf(name)).expect("unique");
        }
        let tree = set.tree();
        let names: Vec<&str> = tree.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
