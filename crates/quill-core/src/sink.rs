/// Receives everything the router wants the player to see.
///
/// Implemented by the host application; usually backed by a [`ChatHistory`](crate::history::ChatHistory).
pub trait ChatSink {
    /// A plain chat message, or output produced by a command.
    fn accept_message(&mut self, text: &str);

    /// A short, line-specific description of something the player got wrong.
    fn report_user_mistake(&mut self, text: &str);

    /// A generic notice that a command failed. Never carries internal detail.
    fn report_internal_error(&mut self, summary: &str);

    fn clear_log(&mut self);
}

/// Receives the full detail of internal errors, out of the player's sight.
pub trait Diagnostics {
    fn record(&mut self, error: &anyhow::Error);
}

/// Default diagnostics sink: logs the whole error chain through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&mut self, error: &anyhow::Error) {
        tracing::error!("Command failed: {error:#}");
        tracing::debug!("Command failure detail: {error:?}");
    }
}
