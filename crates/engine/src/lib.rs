//! # Bettercommit Engine
//!
//! Hook chain compiler and runtime for bettercommit.
//!
//! - **Registry**: resolving chain identifiers to sub-hook files
//! - **Chain**: the typed step model, its compiler and the script renderer
//! - **Finalizer**: installing artifacts into a hooks directory
//! - **Runtime**: executing a compiled chain with the self-update protocol
//!   and the stash safety wrapper
//! - **Git**: the git2-backed work tree used by the runtime

pub mod chain;
pub mod finalizer;
pub mod generate;
pub mod git;
pub mod registry;
pub mod runtime;

// Re-export error types from core
pub use bettercommit_core::{Error, Result};

// Re-export commonly used types
pub use chain::{CompiledArtifact, DEFAULT_PAGER, HookChainCompiler, RenderOptions, Step};
pub use finalizer::{ARTIFACT_MODE, ArtifactFinalizer};
pub use generate::{GenerationReport, InstalledArtifact, generate_all};
pub use git::Git2WorkTree;
pub use registry::{DirectoryRegistry, SubHookInvocation, SubHookRegistry};
pub use runtime::{
    ChainFailure, ChainOutcome, ChainRunner, ChainStatus, DuctLauncher, Invocation,
    ProcessLauncher, Reinvocation, RestoreOutcome, UpdateDecision, WorkTree,
};
