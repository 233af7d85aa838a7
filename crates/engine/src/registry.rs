//! Sub-hook discovery
//!
//! Resolves chain identifiers to sub-hook files. A sub-hook for hook type
//! `pre-commit` and identifier `lint` lives at `<source-dir>/pre-commit.LINT`.

use bettercommit_core::HookType;
use std::path::{Path, PathBuf};

/// One chain entry resolved against the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubHookInvocation {
    /// Identifier as written in the configuration
    pub identifier: String,
    /// Where the sub-hook file is expected
    pub resolved_path: PathBuf,
    /// Whether the file existed when it was resolved
    pub exists: bool,
}

impl SubHookInvocation {
    /// Uppercased identifier, as used in file names and announcements
    #[must_use]
    pub fn display_name(&self) -> String {
        self.identifier.to_uppercase()
    }

    /// File name of the sub-hook (`pre-commit.LINT`)
    #[must_use]
    pub fn file_name(&self) -> String {
        self.resolved_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Resolves which named sub-hooks physically exist
pub trait SubHookRegistry {
    /// Resolve one identifier for one hook type
    fn resolve(&self, hook_type: HookType, identifier: &str) -> SubHookInvocation;
}

/// Registry backed by a directory of `<hook-type>.<IDENTIFIER>` files
#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    source_dir: PathBuf,
}

impl DirectoryRegistry {
    /// Create a registry for the given source directory
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Directory the sub-hooks are resolved in
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

impl SubHookRegistry for DirectoryRegistry {
    fn resolve(&self, hook_type: HookType, identifier: &str) -> SubHookInvocation {
        let resolved_path = self
            .source_dir
            .join(hook_type.sub_hook_file_name(identifier));
        let exists = resolved_path.exists();

        tracing::debug!(
            hook_type = %hook_type,
            identifier,
            path = %resolved_path.display(),
            exists,
            "Resolved sub-hook"
        );

        SubHookInvocation {
            identifier: identifier.to_string(),
            resolved_path,
            exists,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_existing_sub_hook() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pre-commit.LINT"), "#!/bin/sh\n").unwrap();

        let registry = DirectoryRegistry::new(temp.path());
        let invocation = registry.resolve(HookType::PreCommit, "lint");

        assert!(invocation.exists);
        assert_eq!(invocation.identifier, "lint");
        assert_eq!(invocation.resolved_path, temp.path().join("pre-commit.LINT"));
        assert_eq!(invocation.display_name(), "LINT");
        assert_eq!(invocation.file_name(), "pre-commit.LINT");
    }

    #[test]
    fn test_resolve_missing_sub_hook() {
        let temp = TempDir::new().unwrap();
        let registry = DirectoryRegistry::new(temp.path());

        let invocation = registry.resolve(HookType::PrePush, "test");
        assert!(!invocation.exists);
        assert_eq!(invocation.resolved_path, temp.path().join("pre-push.TEST"));
    }

    #[test]
    fn test_resolve_is_per_hook_type() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pre-commit.LINT"), "").unwrap();

        let registry = DirectoryRegistry::new(temp.path());
        assert!(registry.resolve(HookType::PreCommit, "LINT").exists);
        assert!(!registry.resolve(HookType::PostCommit, "LINT").exists);
    }
}
