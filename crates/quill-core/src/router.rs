use crate::command::{CommandNode, CommandPath, CommandSpec};
use crate::error::{validate_prefix, SetupError};
use crate::scope::{self, Outcome, INTERNAL_ERROR_SUMMARY};
use crate::set::{CommandSet, Routed};
use crate::sink::{ChatSink, Diagnostics, TracingDiagnostics};
use crate::tree::{self, CommandTree};

/// What happened to one line handed to [`ChatRouter::receive_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Not a command; forwarded to the sink as a chat message.
    Forwarded,
    /// A command ran (or printed its help) without error.
    Executed,
    UserMistake,
    InternalError,
}

/// Root of the command tree and single entry point for submitted lines.
pub struct ChatRouter<H> {
    root: CommandSet<H>,
    prefix: String,
    tree: CommandTree,
    diagnostics: Box<dyn Diagnostics>,
}

impl<H> std::fmt::Debug for ChatRouter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRouter")
            .field("prefix", &self.prefix)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<H> ChatRouter<H> {
    pub fn builder(prefix: impl Into<String>) -> RouterBuilder<H> {
        RouterBuilder {
            prefix: prefix.into(),
            commands: Vec::new(),
            diagnostics: None,
        }
    }

    /// Takes ownership of a fully registered root set and loads every node in it.
    pub fn new(root: CommandSet<H>) -> Result<Self, SetupError> {
        Self::with_diagnostics(root, Box::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(
        mut root: CommandSet<H>,
        diagnostics: Box<dyn Diagnostics>,
    ) -> Result<Self, SetupError> {
        let prefix = root.prefix().ok_or(SetupError::MissingPrefix)?.to_string();
        validate_prefix(&prefix)?;

        root.load(&CommandPath::root(prefix.as_str()));
        let tree = root.tree();
        tracing::info!(
            "Loaded {} commands ({} top-level) under prefix {prefix:?}",
            root.count(),
            root.len()
        );

        Ok(Self {
            root,
            prefix,
            tree,
            diagnostics,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Suggestions for the word being typed at the end of `text`.
    ///
    /// Empty unless `text` starts with the command prefix.
    pub fn complete(&self, text: &str) -> Vec<String> {
        if !self.root.matches(text) {
            return Vec::new();
        }
        self.tree.complete(self.root.strip_prefix(text))
    }

    /// Nested `{name: subtree}` view of the whole command forest.
    pub fn help_tree(&self) -> CommandTree {
        self.tree.clone()
    }

    /// Help listing every top-level command.
    pub fn help(&self) -> String {
        tree::root_help(&self.prefix, &self.root)
    }

    /// Looks up a node by its space-separated path, without the prefix.
    pub fn find(&self, path: &str) -> Option<&CommandSpec> {
        let mut words = path.split_whitespace();
        let mut node = self.root.get(words.next()?)?;
        for word in words {
            node = node.children()?.get(word)?;
        }
        Some(node.spec())
    }

    /// Full path of a node, as a player would type it.
    pub fn full_name(&self, path: &str) -> Option<String> {
        let mut words = path.split_whitespace();
        let mut node: &CommandNode<H> = self.root.get(words.next()?)?;
        for word in words {
            node = node.children()?.get(word)?;
        }
        Some(node.full_name())
    }
}

impl<H: ChatSink> ChatRouter<H> {
    /// Handles one submitted line. Never fails: every error is reported to `host`.
    pub fn receive_line(&mut self, text: &str, host: &mut H) -> Handled {
        if !self.root.matches(text) {
            host.accept_message(text);
            return Handled::Forwarded;
        }
        tracing::debug!("Dispatching {text:?}");

        let Self {
            root,
            prefix,
            tree: snapshot,
            diagnostics,
        } = self;

        let outcome = scope::run(|| {
            if root.dispatch(text, host, snapshot)? == Routed::OwnerHelp {
                host.accept_message(&tree::root_help(prefix, root));
            }
            Ok(())
        });

        match outcome {
            Outcome::Ok => Handled::Executed,
            Outcome::UserMistake(message) => {
                tracing::warn!("Rejected {text:?}: {message}");
                host.report_user_mistake(&message);
                Handled::UserMistake
            }
            Outcome::InternalError(error) => {
                diagnostics.record(&error);
                host.report_internal_error(INTERNAL_ERROR_SUMMARY);
                Handled::InternalError
            }
        }
    }
}

/// Collects top-level commands before the tree is loaded.
pub struct RouterBuilder<H> {
    prefix: String,
    commands: Vec<CommandNode<H>>,
    diagnostics: Option<Box<dyn Diagnostics>>,
}

impl<H> RouterBuilder<H> {
    pub fn command(mut self, node: CommandNode<H>) -> Self {
        self.commands.push(node);
        self
    }

    pub fn commands(mut self, nodes: impl IntoIterator<Item = CommandNode<H>>) -> Self {
        self.commands.extend(nodes);
        self
    }

    pub fn diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Some(Box::new(diagnostics));
        self
    }

    /// Registers every command and loads the tree.
    pub fn build(self) -> Result<ChatRouter<H>, SetupError> {
        validate_prefix(&self.prefix)?;
        let mut root = CommandSet::prefixed(self.prefix);
        for node in self.commands {
            root.register(node)?;
        }
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Box::new(TracingDiagnostics));
        ChatRouter::with_diagnostics(root, diagnostics)
    }
}
