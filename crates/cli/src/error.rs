//! Error types for CLI commands
//!
//! Structured errors for the failures the commands report themselves. Errors
//! from the library crates convert into [`CommandError::Core`].

use bettercommit_core::HookType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The hook type has no chain in the project configuration
    #[error("Hook type '{hook_type}' is not configured in {}", .config.display())]
    NotConfigured {
        /// Hook type requested
        hook_type: HookType,
        /// Configuration file that was consulted
        config: PathBuf,
    },

    /// Some hook types could not be installed
    #[error("Generation failed: {failed} out of {total} hook types could not be installed")]
    GenerationFailed {
        /// Number of hook types that failed
        failed: usize,
        /// Number of configured hook types
        total: usize,
    },

    /// Unsupported `--format` value
    #[error("Unknown output format '{0}' (expected 'simple' or 'json')")]
    UnknownFormat(String),

    /// Error from the library crates
    #[error(transparent)]
    Core(#[from] bettercommit_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_not_configured_names_hook_and_file() {
        let error = CommandError::NotConfigured {
            hook_type: HookType::PrePush,
            config: PathBuf::from("/cfg/config-default.json"),
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("pre-push"));
        assert!(error_msg.contains("/cfg/config-default.json"));
    }

    #[test]
    fn test_generation_failed_counts() {
        let error = CommandError::GenerationFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(
            error.to_string(),
            "Generation failed: 1 out of 3 hook types could not be installed"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let error: CommandError =
            bettercommit_core::Error::UnknownHookType("pre-foo".into()).into();
        assert_eq!(error.to_string(), "Unknown hook type: pre-foo");
    }
}
