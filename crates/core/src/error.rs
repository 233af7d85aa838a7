//! Base error types for bettercommit
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Name is not one of the recognized git hook types
    #[error("Unknown hook type: {0}")]
    UnknownHookType(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// Artifact could not be written or made executable
    #[error("Failed to finalize {}: {source}", .path.display())]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Git operation error
    #[error("Git error: {0}")]
    Git(String),

    /// Child process could not be started or waited on
    #[error("Failed to run {program}: {reason}")]
    Process { program: String, reason: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
