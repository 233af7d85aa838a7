//! Stash safety wrapper
//!
//! Sub-hooks after the update decision operate on a tree containing only what
//! is staged. Unstaged changes are shelved when the scope opens and restored,
//! merged back with the index, when it closes.

use bettercommit_core::Result;

/// The working tree the chain runs against
pub trait WorkTree {
    /// Whether tracked files differ from the index
    fn has_unstaged_changes(&self) -> Result<bool>;

    /// Shelve uncommitted changes under `label`, keeping the index as is
    fn shelve(&mut self, label: &str) -> Result<()>;

    /// Restore the most recently shelved changes, reinstating the index
    fn restore(&mut self) -> Result<()>;
}

/// Result of closing a [`StashScope`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was shelved, nothing to restore
    NothingShelved,
    /// Shelved changes are back in the working tree
    Restored,
    /// Restoring conflicted with the index; the shelf entry is kept
    Conflict {
        /// Why the restore failed
        reason: String,
    },
}

impl RestoreOutcome {
    /// Operator guidance for a conflicting restore
    pub const CONFLICT_MESSAGE: &'static str =
        "Error: there are conflicts between the stash and the index. Inspect 'git stash list'";
}

/// Scoped shelve/restore around the chain body
///
/// The scope is entered at most once, when the chain reaches its shelve step.
/// [`release`](Self::release) consumes the scope, so changes are restored at
/// most once as well.
#[derive(Debug, Default)]
pub struct StashScope {
    keep_index: bool,
}

impl StashScope {
    /// A scope that has not shelved anything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether changes are currently shelved
    #[must_use]
    pub fn is_shelved(&self) -> bool {
        self.keep_index
    }

    /// Shelve uncommitted changes if the tree has any
    ///
    /// Returns whether anything was shelved.
    pub fn enter(&mut self, work_tree: &mut dyn WorkTree, label: &str) -> Result<bool> {
        if self.keep_index {
            return Ok(false);
        }

        if !work_tree.has_unstaged_changes()? {
            tracing::debug!("Working tree is clean, nothing to shelve");
            return Ok(false);
        }

        work_tree.shelve(label)?;
        self.keep_index = true;
        tracing::debug!(label, "Shelved uncommitted changes");
        Ok(true)
    }

    /// Restore shelved changes, if any
    ///
    /// A failed restore is reported as [`RestoreOutcome::Conflict`] and never
    /// discards the shelved changes.
    pub fn release(self, work_tree: &mut dyn WorkTree) -> RestoreOutcome {
        if !self.keep_index {
            return RestoreOutcome::NothingShelved;
        }

        match work_tree.restore() {
            Ok(()) => {
                tracing::debug!("Restored shelved changes");
                RestoreOutcome::Restored
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to restore shelved changes");
                RestoreOutcome::Conflict {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use bettercommit_core::Error;

    /// In-memory work tree recording stash operations
    #[derive(Debug, Default)]
    pub(crate) struct FakeWorkTree {
        pub dirty: bool,
        pub conflict_on_restore: bool,
        pub shelved: Vec<String>,
        pub restores: usize,
    }

    impl FakeWorkTree {
        pub(crate) fn dirty() -> Self {
            Self {
                dirty: true,
                ..Self::default()
            }
        }
    }

    impl WorkTree for FakeWorkTree {
        fn has_unstaged_changes(&self) -> Result<bool> {
            Ok(self.dirty)
        }

        fn shelve(&mut self, label: &str) -> Result<()> {
            self.shelved.push(label.to_string());
            self.dirty = false;
            Ok(())
        }

        fn restore(&mut self) -> Result<()> {
            self.restores += 1;
            if self.conflict_on_restore {
                return Err(Error::Git("conflict".to_string()));
            }
            self.shelved.pop();
            self.dirty = true;
            Ok(())
        }
    }

    #[test]
    fn test_clean_tree_is_not_shelved() {
        let mut tree = FakeWorkTree::default();
        let mut scope = StashScope::new();

        assert!(!scope.enter(&mut tree, "label").unwrap());
        assert!(!scope.is_shelved());
        assert_eq!(scope.release(&mut tree), RestoreOutcome::NothingShelved);
        assert_eq!(tree.restores, 0);
    }

    #[test]
    fn test_dirty_tree_round_trip() {
        let mut tree = FakeWorkTree::dirty();
        let mut scope = StashScope::new();

        assert!(scope.enter(&mut tree, "label").unwrap());
        assert_eq!(tree.shelved, vec!["label"]);
        assert_eq!(scope.release(&mut tree), RestoreOutcome::Restored);
        assert!(tree.dirty);
        assert_eq!(tree.restores, 1);
    }

    #[test]
    fn test_enter_twice_shelves_once() {
        let mut tree = FakeWorkTree::dirty();
        let mut scope = StashScope::new();

        scope.enter(&mut tree, "first").unwrap();
        tree.dirty = true;
        assert!(!scope.enter(&mut tree, "second").unwrap());
        assert_eq!(tree.shelved, vec!["first"]);
    }

    #[test]
    fn test_conflict_is_reported() {
        let mut tree = FakeWorkTree {
            dirty: true,
            conflict_on_restore: true,
            ..FakeWorkTree::default()
        };
        let mut scope = StashScope::new();
        scope.enter(&mut tree, "label").unwrap();

        let outcome = scope.release(&mut tree);
        assert!(matches!(outcome, RestoreOutcome::Conflict { .. }));
        assert_eq!(tree.shelved.len(), 1);
    }
}
