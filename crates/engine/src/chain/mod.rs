//! Hook chain model
//!
//! A chain is compiled from a [`HookTypeSpec`](bettercommit_config::HookTypeSpec)
//! into a typed sequence of [`Step`]s, which is then serialized to the text of
//! the installed artifact by a single rendering pass.
//!
//! ## Module Organization
//!
//! - `compiler`: turns an ordered list of identifiers into steps
//! - `render`: serializes steps into the executable script text

pub mod compiler;
pub mod render;

use crate::registry::SubHookInvocation;
use bettercommit_core::HookType;
use std::path::PathBuf;

pub use compiler::HookChainCompiler;
pub use render::{DEFAULT_PAGER, RenderOptions};

/// One self-contained fragment of a compiled chain
///
/// Steps share no state except two runtime variables: `bad_cmd` (set by the
/// update protocol) and `keep_index` (set by the shelve step, read by the
/// restore epilogue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Interpreter line, generation stamp, error trap and strict mode
    Preamble,
    /// Run an ordinary sub-hook; any non-zero status aborts the chain
    SubHook(SubHookInvocation),
    /// Run the update sub-hook and apply the self-update protocol
    UpdateProtocol(SubHookInvocation),
    /// Shelve uncommitted changes, keeping the index
    Shelve,
    /// Restore shelved changes, if any were shelved
    RestoreEpilogue,
}

impl Step {
    /// The sub-hook this step invokes, for call steps
    #[must_use]
    pub fn invocation(&self) -> Option<&SubHookInvocation> {
        match self {
            Step::SubHook(invocation) | Step::UpdateProtocol(invocation) => Some(invocation),
            Step::Preamble | Step::Shelve | Step::RestoreEpilogue => None,
        }
    }
}

/// The compiled, rendered artifact for one hook type
///
/// Owned by the compilation that produced it. It is written once by the
/// finalizer and never changed afterwards.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// Hook type the artifact is installed as
    pub hook_type: HookType,
    /// Where the finalizer installs the artifact
    pub target_path: PathBuf,
    /// Steps in execution order, preamble first and epilogue last
    pub rendered_steps: Vec<Step>,
    /// Configured entries that had no file and contribute no step
    pub skipped: Vec<SubHookInvocation>,
    /// Final script text
    pub raw_text: String,
}

impl CompiledArtifact {
    /// Call steps only, in order
    pub fn call_steps(&self) -> impl Iterator<Item = &Step> {
        self.rendered_steps
            .iter()
            .filter(|step| step.invocation().is_some())
    }

    /// Whether the chain contains the self-update protocol
    #[must_use]
    pub fn has_update_protocol(&self) -> bool {
        self.rendered_steps
            .iter()
            .any(|step| matches!(step, Step::UpdateProtocol(_)))
    }
}
