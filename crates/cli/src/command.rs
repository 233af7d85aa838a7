//! Command trait for bettercommit CLI
//!
//! Every subcommand implements [`Command`]; `run` dispatches to it with the
//! shared [`RuntimeContext`].

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all bettercommit commands
///
/// Most commands return `()`. `exec` returns the exit code of the chain it
/// ran, which becomes the process exit code.
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails to execute. Error messages should
    /// be descriptive enough for the user to understand what went wrong.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
