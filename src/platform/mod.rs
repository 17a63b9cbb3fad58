//! Host platform detection and per-OS strategies
//!
//! This module handles:
//! - Platform definitions (OsFamily, PackageManager, Tool, PlatformProfile)
//! - Host detection, done once per run (via detection module)
//! - Dependency installation and shortcut strategies (via strategy module)
//! - Start script and desktop entry generation (via shortcut module)

use std::fmt;

use serde::Serialize;

use crate::outcome::StepOutcome;

pub mod detection;
pub mod shortcut;
pub mod strategy;

pub use detection::detect;
pub use strategy::{InstallAction, PlatformStrategy, select_strategy};

/// Operating system family of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Linux,
}

impl OsFamily {
    /// Map a `std::env::consts::OS` style identifier to a family.
    ///
    /// Anything that is neither Windows nor macOS is handled as a Linux variant.
    pub fn from_identifier(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "windows" => OsFamily::Windows,
            "macos" | "darwin" => OsFamily::MacOs,
            _ => OsFamily::Linux,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Windows => "Windows",
            OsFamily::MacOs => "macOS",
            OsFamily::Linux => "Linux",
        };
        f.write_str(name)
    }
}

/// System package manager driving automated installs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Yum,
    Dnf,
    Homebrew,
}

impl PackageManager {
    /// Linux candidates in priority order
    pub const LINUX_PRIORITY: [PackageManager; 3] =
        [PackageManager::Apt, PackageManager::Yum, PackageManager::Dnf];

    /// Binary probed to decide whether the manager is available
    pub fn probe(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Yum => "yum",
            PackageManager::Dnf => "dnf",
            PackageManager::Homebrew => "brew",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.probe())
    }
}

/// A system tool the application needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Homebrew,
    Node,
    Git,
    #[serde(rename = "postgresql")]
    PostgreSql,
}

impl Tool {
    /// Binary whose `--version` proves the tool is installed
    pub fn probe(self) -> &'static str {
        match self {
            Tool::Homebrew => "brew",
            Tool::Node => "node",
            Tool::Git => "git",
            Tool::PostgreSql => "psql",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tool::Homebrew => "Homebrew",
            Tool::Node => "Node.js",
            Tool::Git => "Git",
            Tool::PostgreSql => "PostgreSQL",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Tools every host needs, in install order
pub const APPLICATION_TOOLS: [Tool; 3] = [Tool::Node, Tool::Git, Tool::PostgreSql];

/// What the installer knows about the host; derived once, read-only afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    pub os: OsFamily,
    pub package_manager: Option<PackageManager>,
    pub required_tools: Vec<Tool>,
}

impl PlatformProfile {
    pub fn new(os: OsFamily, package_manager: Option<PackageManager>) -> Self {
        Self {
            os,
            package_manager,
            required_tools: Vec::new(),
        }
    }

    /// Add a required tool
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.required_tools.push(tool);
        self
    }

    /// Add several required tools, keeping their order
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.required_tools.extend(tools);
        self
    }

    /// Note produced by detection itself, if any
    pub fn detection_outcome(&self) -> Option<StepOutcome> {
        if self.os == OsFamily::Linux && self.package_manager.is_none() {
            Some(StepOutcome::recoverable("no supported package manager"))
        } else {
            None
        }
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manager = self
            .package_manager
            .map_or_else(|| "none".to_string(), |pm| pm.to_string());
        let tools: Vec<_> = self.required_tools.iter().copied().map(Tool::probe).collect();
        write!(
            f,
            "{} (package manager: {}, tools: {})",
            self.os,
            manager,
            tools.join(", ")
        )
    }
}
