//! Runtime of a compiled chain
//!
//! [`ChainRunner`] executes a [`CompiledArtifact`](crate::chain::CompiledArtifact)
//! step by step with the same policy as the rendered script: ordinary
//! sub-hooks fail fast, the update sub-hook goes through the self-update
//! protocol, and uncommitted work is shelved for the rest of the chain and
//! restored exactly once.
//!
//! ## Module Organization
//!
//! - `update`: the self-update state machine and the invocation it reads
//! - `stash`: the work tree seam and the shelve/restore scope
//! - `process`: the child process seam
//! - `runner`: the sequential step executor

pub mod process;
pub mod runner;
pub mod stash;
pub mod update;

use bettercommit_core::HookType;

pub use process::{DuctLauncher, ProcessLauncher};
pub use runner::{ChainFailure, ChainOutcome, ChainRunner, ChainStatus, Reinvocation};
pub use stash::{RestoreOutcome, StashScope, WorkTree};
pub use update::{Invocation, UpdateDecision};

/// Exit code the update sub-hook uses for "template already current"
pub const NO_UPDATE_EXIT_CODE: i32 = 2;

/// Environment marker exported to the one permitted re-invocation
pub const REEXEC_ENV: &str = "BETTERCOMMIT_REEXEC";

/// Positional argument passed to the re-invocation; only its presence matters
pub const GUARD_ARG: &str = "1";

/// Exit code of a chain aborted by a failing step
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Exit code recorded for a child that could not be started, as bash reports it
pub const UNSTARTABLE_EXIT_CODE: i32 = 126;

/// Label of the stash entry holding shelved work
#[must_use]
pub fn stash_label(timestamp: &str) -> String {
    format!("[bettercommit @ {timestamp}] saving temporary work for safe hook operation")
}

/// Message printed when the update sub-hook fails on a fresh invocation
#[must_use]
pub fn update_failed_message(hook_type: HookType) -> String {
    format!("{}.UPDATE_TEMPLATE failed.", hook_type.as_str())
}
