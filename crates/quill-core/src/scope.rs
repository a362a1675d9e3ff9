//! Error-classification boundary around one dispatch attempt.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::CommandError;

/// Shown to the player when a command fails for reasons that are not theirs.
pub const INTERNAL_ERROR_SUMMARY: &str = "An unexpected error occurred.";

/// How a dispatch attempt ended.
#[derive(Debug)]
pub enum Outcome {
    Ok,
    /// The player got something wrong; carries the message to show them.
    UserMistake(String),
    /// Something broke; carries the full error for diagnostics only.
    InternalError(anyhow::Error),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<Result<(), CommandError>> for Outcome {
    fn from(result: Result<(), CommandError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(CommandError::Internal(error)) => Self::InternalError(error),
            Err(mistake) => Self::UserMistake(mistake.to_string()),
        }
    }
}

/// Runs one dispatch attempt and classifies whatever it returned.
///
/// A panic inside the attempt is caught and reported as an internal error.
pub fn run<F>(attempt: F) -> Outcome
where
    F: FnOnce() -> Result<(), CommandError>,
{
    match panic::catch_unwind(AssertUnwindSafe(attempt)) {
        Ok(result) => Outcome::from(result),
        Err(payload) => Outcome::InternalError(anyhow::anyhow!(
            "command panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
