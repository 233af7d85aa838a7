//! CLI command implementations

pub mod configure;
pub mod exec;
pub mod list;
pub mod show;
