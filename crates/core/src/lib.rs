//! Core types for bettercommit
//!
//! This is the foundation crate (Layer 0) that all other bettercommit crates depend on.
//! It provides:
//! - The closed set of recognized git hook types
//! - The reserved sub-hook identifier for template updates
//! - Base error types
//!
//! This crate has no dependencies on other bettercommit crates.

pub mod error;
pub mod hook_type;

pub use error::{Error, Result};
pub use hook_type::{HookType, UPDATE_TEMPLATE};
