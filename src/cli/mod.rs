//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - detect: Detect command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod detect;
pub mod install;

pub use completions::CompletionsArgs;
pub use detect::DetectArgs;
pub use install::InstallArgs;

/// ARS installer
///
/// Installs the Audience Response System web application on this machine.
#[derive(Parser, Debug)]
#[command(
    name = "ars-installer",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installer for the Audience Response System web application",
    long_about = "ars-installer prepares a machine for the Audience Response System: it installs \
                  Node.js, Git and PostgreSQL where possible, fetches the application source, \
                  configures its environment and database, builds it and optionally creates \
                  shortcuts and launches it.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  ars-installer install                       \x1b[90m# Install into ~/AudienceResponseSystem\x1b[0m\n   \
                  ars-installer install --dir /opt/ars --yes  \x1b[90m# Install without prompting\x1b[0m\n   \
                  ars-installer install --no-deps --no-launch \x1b[90m# Skip provisioning and launch\x1b[0m\n   \
                  ars-installer detect --json                 \x1b[90m# Show what was detected\x1b[0m\n"
)]
pub struct Cli {
    /// Installer configuration file (YAML)
    #[arg(long, short = 'c', global = true, env = "ARS_INSTALLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the application
    Install(InstallArgs),

    /// Show the detected platform and tools
    Detect(DetectArgs),

    /// Print the effective installer configuration
    Config,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
