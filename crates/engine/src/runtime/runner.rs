//! Sequential step executor
//!
//! Runs the steps of a compiled chain in order, one child process at a time,
//! and applies the chain's policy to each result instead of relying on shell
//! traps:
//!
//! - an ordinary sub-hook exiting non-zero stops the chain
//! - the update sub-hook is resolved through [`UpdateDecision`]
//! - shelved changes are restored once after the body, on every exit path
//! - a child that cannot be started counts as exiting with 126

use super::stash::{RestoreOutcome, StashScope, WorkTree};
use super::update::{Invocation, UpdateDecision};
use super::{FAILURE_EXIT_CODE, GUARD_ARG, ProcessLauncher, REEXEC_ENV, UNSTARTABLE_EXIT_CODE};
use super::{stash_label, update_failed_message};
use crate::chain::{CompiledArtifact, Step};
use crate::registry::SubHookInvocation;
use bettercommit_core::Result;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

const ANSI_ANNOUNCE: &str = "\x1b[0;37m";
const ANSI_RED: &str = "\x1b[1;31m";
const ANSI_END: &str = "\x1b[0m";

/// Command that re-invokes the artifact for the guarded pass
///
/// The guard argument is appended to `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reinvocation {
    /// Program to run
    pub program: PathBuf,
    /// Leading arguments before the guard argument
    pub args: Vec<String>,
}

impl Reinvocation {
    /// Re-invoke an installed artifact directly
    #[must_use]
    pub fn artifact(path: impl Into<PathBuf>) -> Self {
        Self {
            program: path.into(),
            args: Vec::new(),
        }
    }
}

/// Why a chain stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainFailure {
    /// An ordinary sub-hook exited non-zero
    SubHook {
        /// Identifier of the failing sub-hook
        identifier: String,
        /// Its exit code
        code: i32,
    },
    /// The update sub-hook failed on a pass that may not re-invoke
    UpdateProtocol {
        /// Exit code of the update sub-hook
        code: i32,
    },
}

/// How the chain body ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStatus {
    /// Every step ran
    Completed,
    /// A step aborted the chain
    Failed(ChainFailure),
    /// The artifact was re-invoked; its exit code is the chain's result
    Reexecuted {
        /// Exit code of the re-invocation
        code: i32,
    },
}

/// Result of running a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    /// How the body ended
    pub status: ChainStatus,
    /// What happened to shelved changes
    pub restore: RestoreOutcome,
    /// Display names of the sub-hooks that were run, in order
    pub executed: Vec<String>,
}

impl ChainOutcome {
    /// Exit code the commit tool sees
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match &self.status {
            ChainStatus::Completed => 0,
            ChainStatus::Failed(_) => FAILURE_EXIT_CODE,
            ChainStatus::Reexecuted { code } => *code,
        }
    }

    /// Whether the commit may proceed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

/// Executes a compiled chain
pub struct ChainRunner<'a> {
    artifact: &'a CompiledArtifact,
    launcher: &'a dyn ProcessLauncher,
    reinvocation: Reinvocation,
    color: bool,
}

impl<'a> ChainRunner<'a> {
    /// Runner that re-invokes the artifact's installed path
    pub fn new(artifact: &'a CompiledArtifact, launcher: &'a dyn ProcessLauncher) -> Self {
        Self {
            artifact,
            launcher,
            reinvocation: Reinvocation::artifact(artifact.target_path.clone()),
            color: false,
        }
    }

    /// Use a different command for the guarded re-invocation
    #[must_use]
    pub fn reinvocation(mut self, reinvocation: Reinvocation) -> Self {
        self.reinvocation = reinvocation;
        self
    }

    /// Color operator messages
    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Run the chain
    ///
    /// Operator messages go to `out`. Shelved changes are restored before
    /// returning, including when a step fails or a child cannot be started.
    #[tracing::instrument(skip_all, fields(hook_type = %self.artifact.hook_type))]
    pub fn run(
        &self,
        invocation: &Invocation,
        work_tree: &mut dyn WorkTree,
        out: &mut dyn Write,
    ) -> Result<ChainOutcome> {
        let mut scope = StashScope::new();
        let mut executed = Vec::new();

        let body = self.run_body(invocation, work_tree, &mut scope, &mut executed, out);

        // Epilogue
        let restore = scope.release(work_tree);
        if matches!(restore, RestoreOutcome::Conflict { .. }) {
            writeln!(out, "{}", RestoreOutcome::CONFLICT_MESSAGE)?;
        }

        let status = body?;
        tracing::debug!(?status, ?restore, "Chain finished");

        Ok(ChainOutcome {
            status,
            restore,
            executed,
        })
    }

    fn run_body(
        &self,
        invocation: &Invocation,
        work_tree: &mut dyn WorkTree,
        scope: &mut StashScope,
        executed: &mut Vec<String>,
        out: &mut dyn Write,
    ) -> Result<ChainStatus> {
        for step in &self.artifact.rendered_steps {
            match step {
                Step::Preamble => {
                    tracing::debug!(steps = self.artifact.rendered_steps.len(), "Starting chain");
                }
                Step::SubHook(sub_hook) => {
                    self.announce(sub_hook, out)?;
                    let code = self.launch(&sub_hook.resolved_path, &invocation.args, &[]);
                    executed.push(sub_hook.display_name());

                    if code != 0 {
                        writeln!(out, "{} failed.", sub_hook.file_name())?;
                        self.banner(out)?;
                        return Ok(ChainStatus::Failed(ChainFailure::SubHook {
                            identifier: sub_hook.identifier.clone(),
                            code,
                        }));
                    }
                    separator(out)?;
                }
                Step::UpdateProtocol(sub_hook) => {
                    self.announce(sub_hook, out)?;
                    let code = self.launch(&sub_hook.resolved_path, &[], &[]);
                    executed.push(sub_hook.display_name());

                    match UpdateDecision::evaluate(code, invocation) {
                        UpdateDecision::Proceed => {}
                        UpdateDecision::NoUpdate => {
                            writeln!(out, "No new updates to the template. Skipping update.")?;
                        }
                        UpdateDecision::Recurse { code } => {
                            tracing::info!(code, "Template updated, re-executing");
                            writeln!(
                                out,
                                "Re-executing the {} with an updated template.",
                                self.artifact.hook_type
                            )?;
                            let nested = self.reinvoke();
                            return Ok(ChainStatus::Reexecuted { code: nested });
                        }
                        UpdateDecision::Fail { code } => {
                            writeln!(out, "{}", update_failed_message(self.artifact.hook_type))?;
                            self.banner(out)?;
                            return Ok(ChainStatus::Failed(ChainFailure::UpdateProtocol {
                                code,
                            }));
                        }
                    }
                    separator(out)?;
                }
                Step::Shelve => {
                    let label = stash_label(&Local::now().format("%c").to_string());
                    scope.enter(work_tree, &label)?;
                }
                Step::RestoreEpilogue => {
                    tracing::debug!(shelved = scope.is_shelved(), "Reached chain epilogue");
                }
            }
        }

        Ok(ChainStatus::Completed)
    }

    fn reinvoke(&self) -> i32 {
        let mut args = self.reinvocation.args.clone();
        args.push(GUARD_ARG.to_string());
        let env = [(REEXEC_ENV.to_string(), "1".to_string())];
        self.launch(&self.reinvocation.program, &args, &env)
    }

    fn launch(&self, program: &Path, args: &[String], env: &[(String, String)]) -> i32 {
        match self.launcher.run(program, args, env) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(program = %program.display(), error = %e, "Failed to start");
                UNSTARTABLE_EXIT_CODE
            }
        }
    }

    fn announce(&self, sub_hook: &SubHookInvocation, out: &mut dyn Write) -> Result<()> {
        let message = format!("Executing {} hook...", sub_hook.display_name());
        if self.color {
            writeln!(out, "{ANSI_ANNOUNCE}{message}{ANSI_END}")?;
        } else {
            writeln!(out, "{message}")?;
        }
        separator(out)
    }

    fn banner(&self, out: &mut dyn Write) -> Result<()> {
        let message = "Commit has failed. Fix the errors and try again.";
        if self.color {
            writeln!(out, "{ANSI_RED}{message}{ANSI_END}")?;
        } else {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }
}

fn separator(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", "-".repeat(80))?;
    Ok(())
}
