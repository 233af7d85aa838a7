//! Exec command implementation
//!
//! Runs one hook type's chain in-process instead of through the installed
//! script. The chain is compiled from the current configuration and executed
//! in the repository containing the working directory.

use anyhow::Context;
use bettercommit_core::HookType;
use bettercommit_engine::{
    ChainRunner, DuctLauncher, Git2WorkTree, HookChainCompiler, Invocation, Reinvocation,
    RenderOptions,
};
use clap::Args;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::{ProjectArgs, RuntimeContext};
use crate::error::{CommandError, Result};

/// Exec command
#[derive(Debug, Args)]
pub struct ExecCommand {
    /// Hook type to run
    pub hook_type: HookType,

    /// Project selection
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Re-invoke this artifact after a template update instead of `bettercommit exec`
    #[arg(long, value_name = "PATH")]
    pub artifact: Option<PathBuf>,

    /// Arguments from git, forwarded to every ordinary sub-hook
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Command for ExecCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let config = self.project.load_config();
        let spec = config
            .spec_for(self.hook_type)
            .ok_or_else(|| CommandError::NotConfigured {
                hook_type: self.hook_type,
                config: config.path.clone(),
            })?;

        let cwd = std::env::current_dir()?;
        let mut work_tree = Git2WorkTree::discover(&cwd)?;

        let target = match &self.artifact {
            Some(path) => std::path::absolute(path)?,
            None => work_tree.hooks_dir().join(self.hook_type.as_str()),
        };
        let registry = self.project.registry()?;
        let compiler = HookChainCompiler::new(&registry, RenderOptions::plain());
        let artifact = compiler.compile(&spec, target);

        let reinvocation = match &self.artifact {
            Some(_) => Reinvocation::artifact(artifact.target_path.clone()),
            None => self.self_reinvocation(context)?,
        };

        let launcher = match work_tree.workdir() {
            Some(workdir) => DuctLauncher::new().with_working_dir(workdir),
            None => DuctLauncher::new(),
        };
        let invocation = Invocation::from_env(self.args.clone());
        tracing::debug!(?invocation, "Running chain");

        let mut stdout = std::io::stdout().lock();
        let outcome = ChainRunner::new(&artifact, &launcher)
            .reinvocation(reinvocation)
            .color(context.color)
            .run(&invocation, &mut work_tree, &mut stdout)?;

        Ok(outcome.exit_code())
    }
}

impl ExecCommand {
    /// `bettercommit exec` with the same global flags and project selection
    fn self_reinvocation(&self, context: &RuntimeContext) -> Result<Reinvocation> {
        let program = std::env::current_exe().context("Failed to locate the bettercommit binary")?;
        Ok(Reinvocation {
            program,
            args: self.reinvocation_args(context)?,
        })
    }

    fn reinvocation_args(&self, context: &RuntimeContext) -> Result<Vec<String>> {
        let src_dir = std::path::absolute(&self.project.src_dir)?;
        let cfg_dir = std::path::absolute(&self.project.cfg_dir)?;

        let mut args = context.global_args()?;
        args.extend([
            "exec".to_string(),
            self.hook_type.to_string(),
            "--project".to_string(),
            self.project.project.clone(),
            "--src-dir".to_string(),
            src_dir.display().to_string(),
            "--cfg-dir".to_string(),
            cfg_dir.display().to_string(),
        ]);
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::path::Path;

    fn command() -> ExecCommand {
        ExecCommand {
            hook_type: HookType::PrepareCommitMsg,
            project: ProjectArgs {
                project: "web".to_string(),
                src_dir: PathBuf::from("/src"),
                cfg_dir: PathBuf::from("/cfg"),
            },
            artifact: None,
            args: vec![".git/COMMIT_EDITMSG".to_string()],
        }
    }

    #[test]
    fn test_reinvocation_keeps_project_selection() {
        let args = command()
            .reinvocation_args(&RuntimeContext::new(false, true))
            .unwrap();

        assert_eq!(
            args,
            vec![
                "exec",
                "prepare-commit-msg",
                "--project",
                "web",
                "--src-dir",
                "/src",
                "--cfg-dir",
                "/cfg",
            ]
        );
    }

    #[test]
    fn test_reinvocation_forwards_global_flags() {
        let context = RuntimeContext::new(true, false)
            .with_logging(true, Some(Path::new("/var/log/bettercommit.log")));

        let args = command().reinvocation_args(&context).unwrap();

        assert_eq!(
            &args[..4],
            ["--no-color", "--verbose", "--log-file", "/var/log/bettercommit.log"]
        );
        assert_eq!(args[4], "exec");
        assert!(!args.contains(&".git/COMMIT_EDITMSG".to_string()));
    }
}
