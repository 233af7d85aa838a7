//! Self-update protocol
//!
//! The update sub-hook reports through its exit code:
//!
//! - `0`: ran and nothing needs to happen
//! - `2`: the template is already current
//! - anything else: the template changed underneath us, or the update failed
//!
//! Which of the last two applies depends on how the artifact was invoked. A
//! fresh invocation (no guard argument) treats it as a failure and aborts. A
//! guarded invocation re-executes the artifact once so the remaining chain
//! runs from the updated template. The re-executed pass carries an
//! environment marker and never re-executes again.

use super::{NO_UPDATE_EXIT_CODE, REEXEC_ENV};

/// How the artifact was invoked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Positional arguments, forwarded to ordinary sub-hooks
    pub args: Vec<String>,
    /// Whether this pass was started by a re-invocation
    pub reexecuted: bool,
}

impl Invocation {
    /// A fresh invocation with the given positional arguments
    #[must_use]
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            reexecuted: false,
        }
    }

    /// Build from arguments and the process environment
    #[must_use]
    pub fn from_env(args: Vec<String>) -> Self {
        let reexecuted = std::env::var_os(REEXEC_ENV).is_some_and(|v| !v.is_empty());
        Self { args, reexecuted }
    }

    /// Mark this invocation as the re-executed pass
    #[must_use]
    pub fn mark_reexecuted(mut self) -> Self {
        self.reexecuted = true;
        self
    }

    /// Whether a guard argument is present (any positional argument counts)
    #[must_use]
    pub fn is_guarded(&self) -> bool {
        !self.args.is_empty()
    }
}

/// Outcome of the self-update protocol for one run of the update sub-hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Sub-hook succeeded; continue with the chain
    Proceed,
    /// Template already current; log and continue with the chain
    NoUpdate,
    /// Abort the commit
    Fail {
        /// Exit code of the update sub-hook
        code: i32,
    },
    /// Re-invoke the artifact once and finish with its exit code
    Recurse {
        /// Exit code of the update sub-hook
        code: i32,
    },
}

impl UpdateDecision {
    /// Decide from the update sub-hook's exit code
    #[must_use]
    pub fn evaluate(code: i32, invocation: &Invocation) -> Self {
        match code {
            0 => UpdateDecision::Proceed,
            NO_UPDATE_EXIT_CODE => UpdateDecision::NoUpdate,
            code if invocation.is_guarded() && !invocation.reexecuted => {
                UpdateDecision::Recurse { code }
            }
            code => UpdateDecision::Fail { code },
        }
    }

    /// Whether the chain continues with its next step
    #[must_use]
    pub fn continues(&self) -> bool {
        matches!(self, UpdateDecision::Proceed | UpdateDecision::NoUpdate)
    }
}
