//! Common utilities and types shared across CLI commands

use bettercommit_config::{DEFAULT_PROJECT, ProjectConfig, config_file_path};
use bettercommit_engine::{DEFAULT_PAGER, DirectoryRegistry, RenderOptions};
use clap::Args;
use owo_colors::{OwoColorize, Style};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Options every command resolves a hook chain from
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Name of the project configuration to use (`config-<PROJECT>.json`)
    #[arg(short, long, default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Where the sub-hooks exist
    #[arg(short, long = "src-dir", env = "BETTERCOMMIT_SRC_DIR", value_name = "DIR")]
    pub src_dir: PathBuf,

    /// Directory holding the `config-<PROJECT>.json` files
    #[arg(short, long = "cfg-dir", env = "BETTERCOMMIT_CFG_DIR", value_name = "DIR")]
    pub cfg_dir: PathBuf,
}

impl ProjectArgs {
    /// Path of the configuration file these options select
    pub fn config_path(&self) -> PathBuf {
        config_file_path(&self.cfg_dir, &self.project)
    }

    /// Load the selected configuration, empty if it is missing or invalid
    pub fn load_config(&self) -> ProjectConfig {
        ProjectConfig::load_or_empty(&self.cfg_dir, &self.project)
    }

    /// Registry over the source directory, made absolute
    ///
    /// Sub-hook paths are baked into artifacts that git runs from the work
    /// tree root, so they must not depend on the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read
    pub fn registry(&self) -> std::io::Result<DirectoryRegistry> {
        Ok(DirectoryRegistry::new(std::path::absolute(&self.src_dir)?))
    }
}

/// State shared by all commands for one run
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Color the CLI's own terminal output
    pub color: bool,
    /// `--no-color` was given
    pub no_color: bool,
    /// `--verbose` was given
    pub verbose: bool,
    /// `--log-file` target, if any
    pub log_file: Option<PathBuf>,
}

impl RuntimeContext {
    /// Context for one run
    ///
    /// Terminal output is colored only when stdout is a terminal and
    /// `--no-color` was not given.
    pub fn new(no_color: bool, stdout_is_terminal: bool) -> Self {
        Self {
            color: !no_color && stdout_is_terminal,
            no_color,
            verbose: false,
            log_file: None,
        }
    }

    /// Record the logging flags so nested runs can inherit them
    #[must_use]
    pub fn with_logging(mut self, verbose: bool, log_file: Option<&Path>) -> Self {
        self.verbose = verbose;
        self.log_file = log_file.map(Path::to_path_buf);
        self
    }

    /// Global flags that reproduce this run's output and logging settings
    ///
    /// The log file is made absolute.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read
    pub fn global_args(&self) -> std::io::Result<Vec<String>> {
        let mut args = Vec::new();
        if self.no_color {
            args.push("--no-color".to_string());
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }
        if let Some(log_file) = &self.log_file {
            args.push("--log-file".to_string());
            args.push(std::path::absolute(log_file)?.display().to_string());
        }
        Ok(args)
    }

    /// Options for rendering installed artifacts
    ///
    /// Artifacts run on the developer's terminal later, so only `--no-color`
    /// turns their colors off.
    pub fn render_options(&self, no_pager: bool) -> RenderOptions {
        RenderOptions {
            color: !self.no_color,
            pager: (!no_pager).then(|| DEFAULT_PAGER.to_string()),
        }
    }

    /// Apply `style` to `value` when terminal output is colored
    pub fn paint<T: Display>(&self, value: T, style: Style) -> String {
        if self.color {
            value.style(style).to_string()
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_color_needs_terminal_and_no_flag() {
        assert!(RuntimeContext::new(false, true).color);
        assert!(!RuntimeContext::new(false, false).color);
        assert!(!RuntimeContext::new(true, true).color);
    }

    #[test]
    fn test_render_options_follow_flags() {
        let context = RuntimeContext::new(false, false);
        let options = context.render_options(false);
        assert!(options.color);
        assert_eq!(options.pager.as_deref(), Some(DEFAULT_PAGER));

        let context = RuntimeContext::new(true, true);
        assert_eq!(context.render_options(true), RenderOptions::plain());
    }

    #[test]
    fn test_paint_without_color_is_plain() {
        let context = RuntimeContext::new(true, true);
        assert_eq!(context.paint("written", Style::new().green()), "written");

        let context = RuntimeContext::new(false, true);
        assert!(context.paint("written", Style::new().green()).contains("\x1b["));
    }

    #[test]
    fn test_global_args_forward_flags() {
        assert!(RuntimeContext::new(false, true).global_args().unwrap().is_empty());

        let context = RuntimeContext::new(true, false)
            .with_logging(true, Some(Path::new("/tmp/bettercommit.log")));
        assert_eq!(
            context.global_args().unwrap(),
            vec!["--no-color", "--verbose", "--log-file", "/tmp/bettercommit.log"]
        );
    }

    #[test]
    fn test_relative_log_file_is_made_absolute() {
        let context =
            RuntimeContext::new(false, false).with_logging(false, Some(Path::new("hooks.log")));
        let args = context.global_args().unwrap();

        assert_eq!(args[0], "--log-file");
        let path = PathBuf::from(&args[1]);
        assert!(path.is_absolute());
        assert!(path.ends_with("hooks.log"));
    }

    #[test]
    fn test_registry_source_dir_is_absolute() {
        let args = ProjectArgs {
            project: "web".to_string(),
            src_dir: PathBuf::from("hooks/src"),
            cfg_dir: PathBuf::from("/cfg"),
        };

        let registry = args.registry().unwrap();
        assert!(registry.source_dir().is_absolute());
        assert!(registry.source_dir().ends_with("hooks/src"));
    }

    #[test]
    fn test_config_path() {
        let args = ProjectArgs {
            project: "web".to_string(),
            src_dir: PathBuf::from("/src"),
            cfg_dir: PathBuf::from("/cfg"),
        };
        assert_eq!(args.config_path(), PathBuf::from("/cfg/config-web.json"));
    }
}
