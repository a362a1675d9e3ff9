use std::fmt;

use crate::error::{CommandError, SetupError};
use crate::set::{CommandSet, Routed};
use crate::sink::ChatSink;
use crate::tree::{self, CommandTree};

/// Help text used when a command is declared without any.
pub const DEFAULT_HELP: &str = "No help available for this command.";

/// The argument that asks any node for its help instead of running it.
pub const HELP_TOKEN: &str = "help";

/// Identity of a node in the command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub help: String,
    pub is_group: bool,
}

impl CommandSpec {
    /// First line of the help text, used in listings.
    pub fn summary(&self) -> &str {
        self.help.lines().next().unwrap_or_default()
    }
}

/// Full address of a node: the root prefix followed by every ancestor name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandPath {
    prefix: String,
    segments: Vec<String>,
}

impl CommandPath {
    pub fn root(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            segments: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self {
            prefix: self.prefix.clone(),
            segments,
        }
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.segments.join(" "))
    }
}

/// What a leaf action gets to work with while it runs.
pub struct Context<'a, H> {
    host: &'a mut H,
    path: &'a CommandPath,
    tree: &'a CommandTree,
}

impl<'a, H> Context<'a, H> {
    pub(crate) fn new(host: &'a mut H, path: &'a CommandPath, tree: &'a CommandTree) -> Self {
        Self { host, path, tree }
    }

    pub fn host(&mut self) -> &mut H {
        self.host
    }

    /// Full path of the running command, e.g. `/chat echo`.
    pub fn path(&self) -> &CommandPath {
        self.path
    }

    /// Snapshot of the whole command forest.
    pub fn tree(&self) -> &CommandTree {
        self.tree
    }
}

impl<H: ChatSink> Context<'_, H> {
    /// Shorthand for `host().accept_message(..)`.
    pub fn reply(&mut self, text: &str) {
        self.host.accept_message(text);
    }
}

/// Executable behaviour of a leaf command.
pub trait Action<H> {
    fn run(&mut self, cx: &mut Context<'_, H>, argument: &str) -> Result<(), CommandError>;

    /// Called once when the tree is loaded, before the first dispatch.
    fn on_load(&mut self) {}
}

struct FnAction<F>(F);

impl<H, F> Action<H> for FnAction<F>
where
    F: FnMut(&mut Context<'_, H>, &str) -> Result<(), CommandError>,
{
    fn run(&mut self, cx: &mut Context<'_, H>, argument: &str) -> Result<(), CommandError> {
        (self.0)(cx, argument)
    }
}

pub enum NodeKind<H> {
    Leaf(Box<dyn Action<H>>),
    Group(CommandSet<H>),
}

/// A named unit of the command tree: an executable leaf or a group of subcommands.
pub struct CommandNode<H> {
    spec: CommandSpec,
    path: CommandPath,
    kind: NodeKind<H>,
}

impl<H> fmt::Debug for CommandNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("spec", &self.spec)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<H: 'static> CommandNode<H> {
    /// A leaf backed by a closure.
    pub fn leaf<F>(name: impl Into<String>, help: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut Context<'_, H>, &str) -> Result<(), CommandError> + 'static,
    {
        Self::action(name, help, FnAction(action))
    }

    /// A leaf backed by an [`Action`] implementation.
    pub fn action(
        name: impl Into<String>,
        help: impl Into<String>,
        action: impl Action<H> + 'static,
    ) -> Self {
        Self::with_kind(name.into(), help.into(), NodeKind::Leaf(Box::new(action)))
    }
}

impl<H> CommandNode<H> {
    /// A group whose children are constructed and registered right away.
    pub fn group(
        name: impl Into<String>,
        help: impl Into<String>,
        children: impl IntoIterator<Item = CommandNode<H>>,
    ) -> Result<Self, SetupError> {
        let mut set = CommandSet::nested();
        for child in children {
            set.register(child)?;
        }
        Ok(Self::with_kind(name.into(), help.into(), NodeKind::Group(set)))
    }

    fn with_kind(name: String, help: String, kind: NodeKind<H>) -> Self {
        let help = if help.trim().is_empty() {
            DEFAULT_HELP.to_string()
        } else {
            help
        };
        let is_group = matches!(kind, NodeKind::Group(_));
        Self {
            path: CommandPath::root("").child(&name),
            spec: CommandSpec {
                name,
                help,
                is_group,
            },
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn is_group(&self) -> bool {
        self.spec.is_group
    }

    /// Path assigned when the tree was loaded.
    pub fn path(&self) -> &CommandPath {
        &self.path
    }

    /// Full name as typed by a player, e.g. `/chat echo`.
    pub fn full_name(&self) -> String {
        self.path.to_string()
    }

    pub fn children(&self) -> Option<&CommandSet<H>> {
        match &self.kind {
            NodeKind::Group(set) => Some(set),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn tree(&self) -> CommandTree {
        self.children().map(CommandSet::tree).unwrap_or_default()
    }

    /// Help for this node, listing subcommands for groups.
    pub fn help_text(&self) -> String {
        tree::node_help(&self.path, &self.spec.help, self.children())
    }

    fn shadows_help(&self) -> bool {
        self.children().is_some_and(|set| set.contains(HELP_TOKEN))
    }

    /// Assigns this node's path and readies its subtree.
    pub(crate) fn load(&mut self, owner: &CommandPath) {
        self.path = owner.child(&self.spec.name);
        match &mut self.kind {
            NodeKind::Leaf(action) => action.on_load(),
            NodeKind::Group(set) => set.load(&self.path),
        }
        tracing::debug!("Loaded command {}", self.path);
    }
}

impl<H: ChatSink> CommandNode<H> {
    /// Runs the node with whatever followed its name on the line.
    pub fn trigger(
        &mut self,
        argument: &str,
        host: &mut H,
        tree: &CommandTree,
    ) -> Result<(), CommandError> {
        if argument.trim() == HELP_TOKEN && !self.shadows_help() {
            host.accept_message(&self.help_text());
            return Ok(());
        }
        if self.is_group() && argument.trim().is_empty() {
            host.accept_message(&self.help_text());
            return Ok(());
        }

        match &mut self.kind {
            NodeKind::Leaf(action) => {
                tracing::debug!("Running {} with {argument:?}", self.path);
                let mut cx = Context::new(host, &self.path, tree);
                action.run(&mut cx, argument)
            }
            NodeKind::Group(set) => {
                match set.dispatch(argument, host, tree)? {
                    Routed::Handled => Ok(()),
                    Routed::OwnerHelp => {
                        host.accept_message(&self.help_text());
                        Ok(())
                    }
                }
            }
        }
    }
}
