//! Recognized git hook types
//!
//! Git only invokes hooks under a fixed set of names. Every generated artifact
//! is installed under one of these names, and configuration entries naming
//! anything else are rejected.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of the sub-hook that governs template upgrades
///
/// A chain entry with this identifier is compiled into the self-update
/// protocol instead of an ordinary call.
pub const UPDATE_TEMPLATE: &str = "UPDATE_TEMPLATE";

/// A named event in the git lifecycle for which one artifact is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookType {
    /// `applypatch-msg`
    ApplypatchMsg,
    /// `pre-applypatch`
    PreApplypatch,
    /// `post-applypatch`
    PostApplypatch,
    /// `pre-commit`
    PreCommit,
    /// `prepare-commit-msg`
    PrepareCommitMsg,
    /// `post-commit`
    PostCommit,
    /// `pre-rebase`
    PreRebase,
    /// `post-checkout`
    PostCheckout,
    /// `post-merge`
    PostMerge,
    /// `pre-push`
    PrePush,
    /// `pre-receive`
    PreReceive,
    /// `update`
    Update,
    /// `post-receive`
    PostReceive,
    /// `post-update`
    PostUpdate,
    /// `pre-auto-gc`
    PreAutoGc,
    /// `post-rewrite`
    PostRewrite,
}

impl HookType {
    /// Every recognized hook type, in git's documentation order
    pub const ALL: [HookType; 16] = [
        HookType::ApplypatchMsg,
        HookType::PreApplypatch,
        HookType::PostApplypatch,
        HookType::PreCommit,
        HookType::PrepareCommitMsg,
        HookType::PostCommit,
        HookType::PreRebase,
        HookType::PostCheckout,
        HookType::PostMerge,
        HookType::PrePush,
        HookType::PreReceive,
        HookType::Update,
        HookType::PostReceive,
        HookType::PostUpdate,
        HookType::PreAutoGc,
        HookType::PostRewrite,
    ];

    /// The file name git looks for in the hooks directory
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HookType::ApplypatchMsg => "applypatch-msg",
            HookType::PreApplypatch => "pre-applypatch",
            HookType::PostApplypatch => "post-applypatch",
            HookType::PreCommit => "pre-commit",
            HookType::PrepareCommitMsg => "prepare-commit-msg",
            HookType::PostCommit => "post-commit",
            HookType::PreRebase => "pre-rebase",
            HookType::PostCheckout => "post-checkout",
            HookType::PostMerge => "post-merge",
            HookType::PrePush => "pre-push",
            HookType::PreReceive => "pre-receive",
            HookType::Update => "update",
            HookType::PostReceive => "post-receive",
            HookType::PostUpdate => "post-update",
            HookType::PreAutoGc => "pre-auto-gc",
            HookType::PostRewrite => "post-rewrite",
        }
    }

    /// File name of a sub-hook of this type: `<hook-type>.<IDENTIFIER>`
    ///
    /// The identifier is uppercased, so configuration may spell it in any case.
    #[must_use]
    pub fn sub_hook_file_name(&self, identifier: &str) -> String {
        format!("{}.{}", self.as_str(), identifier.to_uppercase())
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HookType::ALL
            .into_iter()
            .find(|hook_type| hook_type.as_str() == s)
            .ok_or_else(|| Error::UnknownHookType(s.to_string()))
    }
}
