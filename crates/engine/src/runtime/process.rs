//! Child process seam
//!
//! Sub-hooks run as synchronous child processes. The runner only needs their
//! exit codes, so the seam is one method.

use bettercommit_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Runs a program to completion and reports its exit code
pub trait ProcessLauncher {
    /// Run `program` with `args` and extra environment variables
    ///
    /// Stdio is inherited. A non-zero exit is a normal result, not an error;
    /// errors are reserved for programs that could not be started or waited on.
    fn run(&self, program: &Path, args: &[String], env: &[(String, String)]) -> Result<i32>;
}

/// Launcher backed by duct
#[derive(Debug, Clone, Default)]
pub struct DuctLauncher {
    working_dir: Option<PathBuf>,
}

impl DuctLauncher {
    /// Launcher that runs children in the current directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run children in `dir` instead of the current directory
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl ProcessLauncher for DuctLauncher {
    #[tracing::instrument(skip(self, env), fields(program = %program.display()))]
    fn run(&self, program: &Path, args: &[String], env: &[(String, String)]) -> Result<i32> {
        tracing::debug!("Executing: {} {:?}", program.display(), args);

        // Exit codes are inspected by the caller, so don't turn them into errors
        let mut cmd_builder = duct::cmd(program, args).unchecked();
        if let Some(dir) = &self.working_dir {
            cmd_builder = cmd_builder.dir(dir);
        }
        for (key, value) in env {
            cmd_builder = cmd_builder.env(key, value);
        }

        let output = cmd_builder.run().map_err(|e| Error::Process {
            program: program.display().to_string(),
            reason: e.to_string(),
        })?;

        let code = exit_code(&output.status);
        tracing::debug!(code, "Process finished");
        Ok(code)
    }
}

/// Exit code with the shell's convention for signals (128 + signal)
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
