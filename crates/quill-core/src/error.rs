use thiserror::Error;

/// Errors raised while the command tree is being assembled.
///
/// These abort chat construction and are never shown to players.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// Two nodes share a name inside one command set.
    #[error("command `{name}` is already registered")]
    DuplicateRegistration { name: String },

    /// The name is empty or contains whitespace, so dispatch could never reach it.
    #[error("invalid command name `{name}`: names must be non-empty and contain no whitespace")]
    InvalidName { name: String },

    /// The root command set was given an empty prefix.
    #[error("the root command set needs a non-empty prefix")]
    MissingPrefix,

    /// Dispatch splits lines on spaces, so a prefix containing whitespace could never match a name.
    #[error("invalid command prefix {prefix:?}: prefixes must not contain whitespace")]
    InvalidPrefix { prefix: String },
}

/// Checks that `prefix` can start a command line.
pub fn validate_prefix(prefix: &str) -> Result<(), SetupError> {
    if prefix.is_empty() {
        return Err(SetupError::MissingPrefix);
    }
    if prefix.contains(char::is_whitespace) {
        return Err(SetupError::InvalidPrefix {
            prefix: prefix.to_string(),
        });
    }
    Ok(())
}

/// Errors raised while a single line is being dispatched.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The dispatched name is absent from the registry.
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// A leaf action rejected its arguments.
    #[error("{0}")]
    InvalidArgument(String),

    /// Anything else a leaf action failed with.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CommandError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether this error is the player's fault rather than a bug.
    pub fn is_user_mistake(&self) -> bool {
        matches!(self, Self::UnknownCommand { .. } | Self::InvalidArgument(_))
    }
}
