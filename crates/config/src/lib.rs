//! Configuration management for bettercommit
//!
//! This crate handles:
//! - Loading `config-<project>.json` hook chain definitions
//! - Recording the active project in the `current` marker file
//! - Logging initialization

pub mod logging;
pub mod project;

// Re-export error types from core
pub use bettercommit_core::{Error, Result};

// Re-export main types
pub use project::{
    CURRENT_FILE_NAME, DEFAULT_PROJECT, HookTypeSpec, ProjectConfig, config_file_path,
    write_current_marker,
};
