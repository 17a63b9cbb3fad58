//! Command implementations for the installer CLI

pub mod completions;
pub mod config;
pub mod detect;
pub mod install;
pub mod version;
