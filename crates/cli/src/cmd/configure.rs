//! Configure command implementation
//!
//! Generates and installs one artifact per configured hook type.

use bettercommit_config::write_current_marker;
use bettercommit_engine::{ArtifactFinalizer, generate_all};
use clap::Args;
use owo_colors::Style;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::{ProjectArgs, RuntimeContext};
use crate::error::{CommandError, Result};

/// Configure command
#[derive(Debug, Args)]
pub struct ConfigureCommand {
    /// Project selection
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Location to install the hooks (artifacts of unconfigured hook types here are removed)
    #[arg(short, long = "dst-dir", value_name = "DIR")]
    pub dst_dir: PathBuf,

    /// Directory of the `current` file recording the configured project
    #[arg(short = 'u', long = "cur-dir", value_name = "DIR")]
    pub cur_dir: PathBuf,

    /// Don't pipe hook output through a pager
    #[arg(long)]
    pub no_pager: bool,
}

impl Command for ConfigureCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let config_path = self.project.config_path();
        println!("Config file used: [{}]\n", config_path.display());

        // The update sub-hook reads the marker to know which project to regenerate
        match write_current_marker(&self.cur_dir, &self.project.project) {
            Ok(path) => println!(
                "Writing project [{}] to 'current' file @ [{}]",
                self.project.project,
                path.display()
            ),
            Err(e) => tracing::error!("Failed to write 'current' file: {e}"),
        }

        let config = self.project.load_config();
        let registry = self.project.registry()?;
        let finalizer = self.finalizer()?;
        tracing::debug!(dst_dir = %finalizer.dst_dir().display(), "Installing hooks");
        let report = generate_all(
            &config,
            &registry,
            &finalizer,
            &context.render_options(self.no_pager),
        );

        for path in &report.removed {
            println!(
                "{} {}",
                context.paint("Removing...", Style::new().yellow()),
                path.display()
            );
        }

        for installed in &report.installed {
            println!(
                "[{}] written.",
                context.paint(installed.path.display(), Style::new().green())
            );
        }

        for (hook_type, error) in &report.failed {
            println!(
                "{}: {hook_type}: {error}",
                context.paint("Error", Style::new().red().bold())
            );
        }

        if !report.is_success() {
            return Err(CommandError::GenerationFailed {
                failed: report.failed.len(),
                total: config.hooks.len(),
            });
        }

        Ok(())
    }
}

impl ConfigureCommand {
    /// Finalizer over the absolute destination directory
    fn finalizer(&self) -> std::io::Result<ArtifactFinalizer> {
        Ok(ArtifactFinalizer::new(std::path::absolute(&self.dst_dir)?))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use bettercommit_core::HookType;

    #[test]
    fn test_relative_dst_dir_is_made_absolute() {
        let command = ConfigureCommand {
            project: ProjectArgs {
                project: "web".to_string(),
                src_dir: PathBuf::from("hooks"),
                cfg_dir: PathBuf::from("cfg"),
            },
            dst_dir: PathBuf::from(".git/hooks"),
            cur_dir: PathBuf::from("."),
            no_pager: true,
        };

        let finalizer = command.finalizer().unwrap();
        assert!(finalizer.dst_dir().is_absolute());
        let target = finalizer.target_path(HookType::PreCommit);
        assert!(target.is_absolute());
        assert!(target.ends_with(".git/hooks/pre-commit"));
    }
}
