//! Bettercommit CLI library
//!
//! This library contains all the CLI logic for bettercommit, making it
//! reusable for testing.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

/// Bettercommit - compose git hooks from ordered chains of sub-hooks
#[derive(Parser)]
#[command(name = "bettercommit")]
#[command(about = "Compose git hooks from ordered chains of sub-hooks")]
#[command(version)]
#[command(long_about = "Compose git hooks from ordered chains of sub-hooks

Each configured hook type gets one generated script that runs its sub-hooks
in order, stops at the first failure, keeps unstaged work out of the way of
the checks, and re-runs itself once when the hook template was updated.")]
pub struct Cli {
    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "BETTERCOMMIT_LOG_FILE", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colors in terminal output and generated hooks
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for bettercommit CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Generate and install the hooks of a project
    Configure(cmd::configure::ConfigureCommand),

    /// Print the generated hook for one hook type without installing it
    Show(cmd::show::ShowCommand),

    /// List configured hook types and their sub-hooks
    List(cmd::list::ListCommand),

    /// Run the chain of one hook type in the current repository
    #[command(long_about = "Run the chain of one hook type in the current repository

The chain is compiled from the current configuration and executed directly,
with the same behavior as the installed hook: sub-hooks run in order, the
first failure aborts, unstaged changes are stashed after the update check
and restored at the end.

Positional arguments are forwarded to every ordinary sub-hook. When any are
present, a failed template update re-runs the chain once.")]
    Exec(cmd::exec::ExecCommand),
}

/// Main entry point for the CLI logic
///
/// Returns the process exit code.
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - Command execution fails
pub fn run(cli: Cli) -> Result<i32> {
    // Initialize logging based on verbosity
    bettercommit_config::logging::init(cli.verbose, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let context = RuntimeContext::new(cli.no_color, std::io::stdout().is_terminal())
        .with_logging(cli.verbose, cli.log_file.as_deref());

    execute_command(cli.command, &context)
}

/// Execute the command based on the command type
fn execute_command(command: Commands, context: &RuntimeContext) -> Result<i32> {
    match command {
        Commands::Configure(configure_cmd) => {
            configure_cmd
                .execute(context)
                .context("Failed to configure hooks")?;
        }
        Commands::Show(show_cmd) => {
            show_cmd.execute(context)?;
        }
        Commands::List(list_cmd) => {
            list_cmd.execute(context)?;
        }
        Commands::Exec(exec_cmd) => {
            return Ok(exec_cmd.execute(context)?);
        }
    }

    Ok(0)
}
