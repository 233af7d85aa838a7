//! Project configuration loading
//!
//! A project configuration names, per hook type, the ordered list of sub-hooks
//! that make up its chain. It lives in `<cfg-dir>/config-<project>.json`:
//!
//! ```json
//! {
//!   "hooks": [
//!     { "name": "pre-commit", "ordering": ["update_template", "lint", "test"] },
//!     { "name": "pre-push", "ordering": ["test"] }
//!   ]
//! }
//! ```

use bettercommit_core::{Error, HookType, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Project used when none is given on the command line
pub const DEFAULT_PROJECT: &str = "default";

/// Name of the marker file recording the active project
pub const CURRENT_FILE_NAME: &str = "current";

/// Path of the configuration file for `project` inside `cfg_dir`
#[must_use]
pub fn config_file_path(cfg_dir: &Path, project: &str) -> PathBuf {
    cfg_dir.join(format!("config-{project}.json"))
}

/// The ordered chain of sub-hooks for one hook type
///
/// Insertion order of `ordered_sub_hooks` is significant and preserved.
/// Duplicates are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookTypeSpec {
    /// Hook type the chain is installed for
    pub hook_type: HookType,
    /// Sub-hook identifiers in execution order
    pub ordered_sub_hooks: Vec<String>,
}

impl HookTypeSpec {
    /// Create a spec from any iterable of identifiers
    pub fn new<I, S>(hook_type: HookType, ordered_sub_hooks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hook_type,
            ordered_sub_hooks: ordered_sub_hooks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    hooks: Vec<RawHookEntry>,
}

#[derive(Debug, Deserialize)]
struct RawHookEntry {
    name: String,
    #[serde(default)]
    ordering: Vec<String>,
}

/// Hook chains configured for one project
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// Project name (the `<project>` in `config-<project>.json`)
    pub project: String,
    /// File the configuration was read from
    pub path: PathBuf,
    /// Configured chains keyed by hook type, in configuration order
    pub hooks: IndexMap<HookType, Vec<String>>,
}

impl ProjectConfig {
    /// Load the configuration for `project` from `cfg_dir`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or is not valid JSON
    /// of the expected shape.
    pub fn load(cfg_dir: &Path, project: &str) -> Result<Self> {
        let path = config_file_path(cfg_dir, project);
        let content = fs::read_to_string(&path).map_err(|e| Error::Config {
            path: path.clone(),
            reason: format!("{project} is not a valid project name ({e})"),
        })?;

        Self::from_json_str(&content, project, &path)
    }

    /// Load the configuration, treating any failure as "no hooks configured"
    ///
    /// The failure is logged so the operator sees it, but the caller can still
    /// run the cleanup of previously installed artifacts.
    pub fn load_or_empty(cfg_dir: &Path, project: &str) -> Self {
        match Self::load(cfg_dir, project) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e}");
                Self {
                    project: project.to_string(),
                    path: config_file_path(cfg_dir, project),
                    hooks: IndexMap::new(),
                }
            }
        }
    }

    /// Parse configuration content
    ///
    /// Entries naming an unknown hook type are skipped with a warning. When a
    /// hook type appears twice the later ordering wins and the hook type keeps
    /// its first position.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `content` is not valid JSON of the expected shape.
    pub fn from_json_str(content: &str, project: &str, path: &Path) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: format!("Failed to parse config JSON: {e}"),
        })?;

        let mut hooks = IndexMap::new();
        for entry in raw.hooks {
            let hook_type = match entry.name.parse::<HookType>() {
                Ok(hook_type) => hook_type,
                Err(e) => {
                    tracing::warn!(config = %path.display(), "{e}. Ignoring.");
                    continue;
                }
            };

            if hooks.insert(hook_type, entry.ordering).is_some() {
                tracing::warn!(
                    config = %path.display(),
                    "Hook type '{hook_type}' is configured more than once; using the last ordering"
                );
            }
        }

        Ok(Self {
            project: project.to_string(),
            path: path.to_path_buf(),
            hooks,
        })
    }

    /// Chains to compile, in configuration order
    #[must_use]
    pub fn specs(&self) -> Vec<HookTypeSpec> {
        self.hooks
            .iter()
            .map(|(hook_type, ordering)| HookTypeSpec::new(*hook_type, ordering.iter().cloned()))
            .collect()
    }

    /// Chain configured for one hook type, if any
    #[must_use]
    pub fn spec_for(&self, hook_type: HookType) -> Option<HookTypeSpec> {
        self.hooks
            .get(&hook_type)
            .map(|ordering| HookTypeSpec::new(hook_type, ordering.iter().cloned()))
    }

    /// Recognized hook types that this configuration does not name
    ///
    /// Artifacts previously installed for these are stale.
    #[must_use]
    pub fn unconfigured(&self) -> Vec<HookType> {
        HookType::ALL
            .into_iter()
            .filter(|hook_type| !self.hooks.contains_key(hook_type))
            .collect()
    }
}

/// Write the active project name to `<cur_dir>/current`, replacing its content
///
/// The update sub-hook reads this file to know which configuration to
/// regenerate from.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_current_marker(cur_dir: &Path, project: &str) -> Result<PathBuf> {
    let path = cur_dir.join(CURRENT_FILE_NAME);
    fs::write(&path, format!("{project}\n"))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<ProjectConfig> {
        ProjectConfig::from_json_str(content, "default", Path::new("config-default.json"))
    }

    #[test]
    fn test_parse_preserves_order() {
        let config = parse(
            r#"{"hooks": [
                {"name": "pre-push", "ordering": ["test"]},
                {"name": "pre-commit", "ordering": ["lint", "update_template", "test"]}
            ]}"#,
        )
        .unwrap();

        let specs = config.specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].hook_type, HookType::PrePush);
        assert_eq!(specs[1].hook_type, HookType::PreCommit);
        assert_eq!(
            specs[1].ordered_sub_hooks,
            vec!["lint", "update_template", "test"]
        );
    }

    #[test]
    fn test_parse_keeps_duplicate_identifiers() {
        let config =
            parse(r#"{"hooks": [{"name": "pre-commit", "ordering": ["lint", "lint"]}]}"#).unwrap();
        let spec = config.spec_for(HookType::PreCommit).unwrap();
        assert_eq!(spec.ordered_sub_hooks, vec!["lint", "lint"]);
    }

    #[test]
    fn test_parse_skips_unknown_hook_type() {
        let config = parse(
            r#"{"hooks": [
                {"name": "pre-comit", "ordering": ["lint"]},
                {"name": "post-merge", "ordering": []}
            ]}"#,
        )
        .unwrap();

        assert_eq!(config.hooks.len(), 1);
        assert!(config.hooks.contains_key(&HookType::PostMerge));
    }

    #[test]
    fn test_parse_repeated_hook_type_last_wins() {
        let config = parse(
            r#"{"hooks": [
                {"name": "pre-commit", "ordering": ["a"]},
                {"name": "pre-push", "ordering": ["b"]},
                {"name": "pre-commit", "ordering": ["c"]}
            ]}"#,
        )
        .unwrap();

        let specs = config.specs();
        assert_eq!(specs[0].hook_type, HookType::PreCommit);
        assert_eq!(specs[0].ordered_sub_hooks, vec!["c"]);
        assert_eq!(specs[1].hook_type, HookType::PrePush);
    }

    #[test]
    fn test_parse_missing_hooks_key_is_empty() {
        let config = parse("{}").unwrap();
        assert!(config.hooks.is_empty());
        assert_eq!(config.unconfigured().len(), HookType::ALL.len());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("Failed to parse config JSON"));
    }

    #[test]
    fn test_unconfigured_excludes_configured() {
        let config =
            parse(r#"{"hooks": [{"name": "pre-commit", "ordering": ["lint"]}]}"#).unwrap();
        let unconfigured = config.unconfigured();
        assert_eq!(unconfigured.len(), HookType::ALL.len() - 1);
        assert!(!unconfigured.contains(&HookType::PreCommit));
        assert!(unconfigured.contains(&HookType::PostCommit));
    }

    #[test]
    fn test_load_from_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config-web.json"),
            r#"{"hooks": [{"name": "pre-commit", "ordering": ["lint"]}]}"#,
        )
        .unwrap();

        let config = ProjectConfig::load(temp.path(), "web").unwrap();
        assert_eq!(config.project, "web");
        assert_eq!(config.path, temp.path().join("config-web.json"));
        assert!(config.spec_for(HookType::PreCommit).is_some());
    }

    #[test]
    fn test_load_missing_project() {
        let temp = TempDir::new().unwrap();
        let err = ProjectConfig::load(temp.path(), "nope").unwrap_err();
        assert!(err.to_string().contains("nope is not a valid project name"));
    }

    #[test]
    fn test_load_or_empty_recovers() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config-broken.json"), "[[[").unwrap();

        let broken = ProjectConfig::load_or_empty(temp.path(), "broken");
        assert!(broken.hooks.is_empty());
        assert_eq!(broken.project, "broken");

        let missing = ProjectConfig::load_or_empty(temp.path(), "missing");
        assert!(missing.hooks.is_empty());
    }

    #[test]
    fn test_write_current_marker_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = write_current_marker(temp.path(), "first").unwrap();
        write_current_marker(temp.path(), "second").unwrap();

        assert_eq!(path, temp.path().join(CURRENT_FILE_NAME));
        assert_eq!(fs::read_to_string(path).unwrap(), "second\n");
    }
}
