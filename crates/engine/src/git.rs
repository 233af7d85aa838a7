//! Git work tree backed by git2 (libgit2)
//!
//! Implements the [`WorkTree`] seam of the runtime: detecting unstaged
//! changes, shelving them into the stash with the index kept, and popping
//! them back with the index reinstated.

use crate::runtime::WorkTree;
use bettercommit_core::Result;
use git2::{Repository, Signature, StashApplyOptions, StashFlags, Status, StatusOptions};
use std::path::{Path, PathBuf};

/// Helper function to convert git2 errors to `bettercommit_core` errors
#[inline]
#[allow(clippy::needless_pass_by_value)]
fn git_err(e: git2::Error) -> bettercommit_core::Error {
    bettercommit_core::Error::Git(e.message().to_string())
}

/// Changes between the index and the working tree, as `git diff` sees them
const UNSTAGED: Status = Status::WT_MODIFIED
    .union(Status::WT_DELETED)
    .union(Status::WT_TYPECHANGE)
    .union(Status::WT_RENAMED);

/// Stasher identity when the repository has no `user.name`/`user.email`
const FALLBACK_NAME: &str = "bettercommit";
const FALLBACK_EMAIL: &str = "bettercommit@localhost";

/// A repository's working tree
pub struct Git2WorkTree {
    repo: Repository,
}

impl Git2WorkTree {
    /// Find the repository containing `path`
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not inside a git repository
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(git_err)?;
        Ok(Self { repo })
    }

    /// Wrap an already opened repository
    #[must_use]
    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// The repository's hooks directory (`.git/hooks`)
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.repo.path().join("hooks")
    }

    /// Root of the working tree, `None` for a bare repository
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn stasher(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(_) => Signature::now(FALLBACK_NAME, FALLBACK_EMAIL).map_err(git_err),
        }
    }
}

impl WorkTree for Git2WorkTree {
    fn has_unstaged_changes(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options)).map_err(git_err)?;
        Ok(statuses.iter().any(|s| s.status().intersects(UNSTAGED)))
    }

    fn shelve(&mut self, label: &str) -> Result<()> {
        let stasher = self.stasher()?;
        let oid = self
            .repo
            .stash_save(&stasher, label, Some(StashFlags::KEEP_INDEX))
            .map_err(git_err)?;
        tracing::debug!(%oid, "Saved stash");
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        let mut options = StashApplyOptions::new();
        options.reinstantiate_index();
        self.repo.stash_pop(0, Some(&mut options)).map_err(git_err)
    }
}
