//! Error types and handling for the installer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`command`]: External command errors
//! - [`source`]: Source acquisition errors (download, extract, replace)
//! - [`config`]: Installer configuration errors
//! - [`fs`]: File system errors

pub mod command;
pub mod config;
pub mod fs;
pub mod source;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallerError {
    // Command errors
    #[error("Command failed ({status}): {command}\n{stderr}")]
    #[diagnostic(
        code(ars_installer::command::execution_failed),
        help("See the installation log above for the full command output")
    )]
    CommandExecutionFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to start command: {command}: {reason}")]
    #[diagnostic(code(ars_installer::command::spawn_failed))]
    CommandSpawnFailed { command: String, reason: String },

    // Source errors
    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(
        code(ars_installer::source::download_failed),
        help("Check your internet connection and that the archive URL is reachable")
    )]
    DownloadFailed { url: String, reason: String },

    #[error("Failed to extract archive {path}: {reason}")]
    #[diagnostic(code(ars_installer::source::extract_failed))]
    ExtractFailed { path: String, reason: String },

    #[error("Archive entry escapes the destination directory: {entry}")]
    #[diagnostic(code(ars_installer::source::unsafe_entry))]
    UnsafeArchiveEntry { entry: String },

    #[error("Failed to move {from} to {to}: {reason}")]
    #[diagnostic(code(ars_installer::source::replace_failed))]
    ReplaceDirFailed {
        from: String,
        to: String,
        reason: String,
    },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(ars_installer::config::not_found),
        help("Pass an existing file with --config or unset ARS_INSTALLER_CONFIG")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(ars_installer::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(ars_installer::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(ars_installer::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Invalid installation directory {path}: {reason}")]
    #[diagnostic(
        code(ars_installer::fs::invalid_target),
        help("Choose a directory you can write to")
    )]
    InvalidTargetDir { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(ars_installer::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ars_installer::fs::io_error))]
    IoError { message: String },

    #[error("Could not determine the home directory")]
    #[diagnostic(
        code(ars_installer::fs::no_home),
        help("Pass the installation directory explicitly with --dir")
    )]
    HomeDirNotFound,

    // Pipeline errors
    #[error("An installation is already running")]
    #[diagnostic(
        code(ars_installer::pipeline::run_in_progress),
        help("Wait for the current installation to finish before starting another")
    )]
    RunInProgress,

    #[error("Installation worker stopped unexpectedly")]
    #[diagnostic(code(ars_installer::pipeline::worker_panicked))]
    WorkerPanicked,

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(ars_installer::ui::prompt_failed))]
    PromptFailed { message: String },

    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(ars_installer::ui::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },
}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        InstallerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for InstallerError {
    fn from(err: serde_yaml::Error) -> Self {
        InstallerError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for InstallerError {
    fn from(err: serde_json::Error) -> Self {
        InstallerError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for InstallerError {
    fn from(err: reqwest::Error) -> Self {
        InstallerError::DownloadFailed {
            url: err
                .url()
                .map_or_else(|| "unknown".to_string(), ToString::to_string),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for InstallerError {
    fn from(err: inquire::InquireError) -> Self {
        InstallerError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, InstallerError>;
