pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod markup;
pub mod router;
pub mod scope;
pub mod set;
pub mod sink;
pub mod tree;

#[cfg(test)]
mod testing;

pub use command::{Action, CommandNode, CommandPath, CommandSpec, Context};
pub use config::{load_config, ChatConfig};
pub use error::{validate_prefix, CommandError, SetupError};
pub use history::{ChatHistory, Severity};
pub use router::{ChatRouter, Handled, RouterBuilder};
pub use set::CommandSet;
pub use sink::{ChatSink, Diagnostics, TracingDiagnostics};
pub use tree::CommandTree;
