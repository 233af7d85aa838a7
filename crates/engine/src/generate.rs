//! Configuration-time generation of every artifact of a project

use crate::chain::{HookChainCompiler, RenderOptions};
use crate::finalizer::ArtifactFinalizer;
use crate::registry::{SubHookInvocation, SubHookRegistry};
use bettercommit_config::ProjectConfig;
use bettercommit_core::{Error, HookType};
use std::path::PathBuf;

/// One installed artifact
#[derive(Debug)]
pub struct InstalledArtifact {
    /// Hook type installed
    pub hook_type: HookType,
    /// Installed path
    pub path: PathBuf,
    /// Configured sub-hooks left out because their file did not exist
    pub skipped: Vec<SubHookInvocation>,
}

/// What a generation run did
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Artifacts of unconfigured hook types that were removed
    pub removed: Vec<PathBuf>,
    /// Artifacts written, in configuration order
    pub installed: Vec<InstalledArtifact>,
    /// Hook types whose artifact could not be installed
    pub failed: Vec<(HookType, Error)>,
}

impl GenerationReport {
    /// Whether every configured hook type was installed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove stale artifacts, then compile and install every configured hook type
///
/// A hook type that fails to install is recorded in the report and does not
/// prevent the others from being installed.
#[tracing::instrument(skip_all, fields(project = %config.project))]
pub fn generate_all<R>(
    config: &ProjectConfig,
    registry: &R,
    finalizer: &ArtifactFinalizer,
    options: &RenderOptions,
) -> GenerationReport
where
    R: SubHookRegistry,
{
    let mut report = GenerationReport {
        removed: finalizer.remove_unconfigured(&config.unconfigured()),
        ..GenerationReport::default()
    };

    let compiler = HookChainCompiler::new(registry, options.clone());
    for spec in config.specs() {
        let artifact = compiler.compile(&spec, finalizer.target_path(spec.hook_type));

        match finalizer.install(&artifact) {
            Ok(path) => report.installed.push(InstalledArtifact {
                hook_type: spec.hook_type,
                path,
                skipped: artifact.skipped,
            }),
            Err(e) => {
                tracing::error!(
                    hook_type = %spec.hook_type,
                    error = %e,
                    "Failed to install artifact"
                );
                report.failed.push((spec.hook_type, e));
            }
        }
    }

    tracing::debug!(
        removed = report.removed.len(),
        installed = report.installed.len(),
        failed = report.failed.len(),
        "Generation finished"
    );
    report
}
