//! Artifact installation
//!
//! Persists compiled artifacts into the destination hooks directory and
//! removes artifacts left behind by hook types that are no longer configured.

use crate::chain::CompiledArtifact;
use bettercommit_core::{Error, HookType, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Permissions of an installed artifact: owner rwx, group rx, others none
pub const ARTIFACT_MODE: u32 = 0o750;

/// Installs artifacts into one hooks directory
#[derive(Debug, Clone)]
pub struct ArtifactFinalizer {
    dst_dir: PathBuf,
}

impl ArtifactFinalizer {
    /// Finalizer for the given hooks directory
    #[must_use]
    pub fn new(dst_dir: impl Into<PathBuf>) -> Self {
        Self {
            dst_dir: dst_dir.into(),
        }
    }

    /// Destination hooks directory
    #[must_use]
    pub fn dst_dir(&self) -> &Path {
        &self.dst_dir
    }

    /// Where the artifact for `hook_type` is installed
    #[must_use]
    pub fn target_path(&self, hook_type: HookType) -> PathBuf {
        self.dst_dir.join(hook_type.as_str())
    }

    /// Write the artifact to its target path and make it executable
    ///
    /// An existing file at the target path is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Finalize`] if the file cannot be written or its
    /// permissions cannot be set
    #[tracing::instrument(skip(self, artifact), fields(hook_type = %artifact.hook_type))]
    pub fn install(&self, artifact: &CompiledArtifact) -> Result<PathBuf> {
        let path = artifact.target_path.clone();
        let finalize_err = |source: std::io::Error| Error::Finalize {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(finalize_err)?;
        }
        fs::write(&path, artifact.raw_text.as_bytes()).map_err(finalize_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(ARTIFACT_MODE))
                .map_err(finalize_err)?;
        }

        tracing::info!(path = %path.display(), "Installed artifact");
        Ok(path)
    }

    /// Remove the artifacts of `hook_types`
    ///
    /// Files and directories are both removed. Failures are logged and do not
    /// stop the remaining removals. Returns the paths actually removed.
    pub fn remove_unconfigured(&self, hook_types: &[HookType]) -> Vec<PathBuf> {
        let mut removed = Vec::new();

        for &hook_type in hook_types {
            let path = self.target_path(hook_type);
            let Ok(metadata) = fs::symlink_metadata(&path) else {
                continue;
            };

            let result = if metadata.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };

            match result {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Removed unconfigured artifact");
                    removed.push(path);
                }
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove artifact"
                    );
                }
            }
        }

        removed
    }
}
