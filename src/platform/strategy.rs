//! Per-OS installation strategies
//!
//! A strategy is selected once from the [`PlatformProfile`]; everything
//! downstream asks the strategy instead of re-testing the OS.

use crate::error::Result;
use crate::outcome::StepOutcome;

use super::shortcut::{self, ShortcutRequest};
use super::{OsFamily, PackageManager, PlatformProfile, Tool};

const HOMEBREW_BOOTSTRAP: &str = "NONINTERACTIVE=1 /bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"";

/// How a missing tool gets installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    /// Shell command line that installs the tool
    Command(String),
    /// No automated install; guidance for the user
    Manual(String),
}

/// Platform-specific behaviour of the installer
pub trait PlatformStrategy: Send + Sync {
    fn family(&self) -> OsFamily;

    /// Package index refresh to run once before the first install
    fn refresh_command(&self) -> Option<String> {
        None
    }

    fn install_action(&self, tool: Tool) -> InstallAction;

    /// Register the application with the desktop environment
    fn create_shortcut(&self, request: &ShortcutRequest) -> Result<StepOutcome>;

    /// Command line that starts the application server
    fn start_command(&self) -> &'static str {
        "yarn start"
    }

    /// Command line that opens `url` in the default browser
    fn open_url_command(&self, url: &str) -> String;
}

/// Build the strategy for a detected profile
pub fn select_strategy(profile: &PlatformProfile) -> Box<dyn PlatformStrategy> {
    match profile.os {
        OsFamily::Windows => Box::new(WindowsStrategy),
        OsFamily::MacOs => Box::new(MacStrategy),
        OsFamily::Linux => Box::new(LinuxStrategy {
            manager: profile.package_manager,
        }),
    }
}

/// Windows: manual guidance only
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsStrategy;

impl PlatformStrategy for WindowsStrategy {
    fn family(&self) -> OsFamily {
        OsFamily::Windows
    }

    fn install_action(&self, tool: Tool) -> InstallAction {
        let url = match tool {
            Tool::Node => "https://nodejs.org",
            Tool::Git => "https://git-scm.com",
            Tool::PostgreSql => "https://www.postgresql.org/download/windows/",
            Tool::Homebrew => {
                return InstallAction::Manual("Homebrew is not used on Windows".to_string());
            }
        };
        InstallAction::Manual(format!(
            "Please install {} from {url} before continuing.",
            tool.display_name()
        ))
    }

    fn create_shortcut(&self, request: &ShortcutRequest) -> Result<StepOutcome> {
        Ok(StepOutcome::recoverable(format!(
            "Shortcut creation is not automated on Windows; start the application with `yarn start` in {}",
            request.app_dir.display()
        )))
    }

    fn start_command(&self) -> &'static str {
        "cmd /c yarn start"
    }

    fn open_url_command(&self, url: &str) -> String {
        format!("start \"\" \"{url}\"")
    }
}

/// macOS: Homebrew, bootstrapped when missing
#[derive(Debug, Clone, Copy, Default)]
pub struct MacStrategy;

impl PlatformStrategy for MacStrategy {
    fn family(&self) -> OsFamily {
        OsFamily::MacOs
    }

    fn install_action(&self, tool: Tool) -> InstallAction {
        let formula = match tool {
            Tool::Homebrew => return InstallAction::Command(HOMEBREW_BOOTSTRAP.to_string()),
            Tool::Node => "node",
            Tool::Git => "git",
            Tool::PostgreSql => "postgresql@14",
        };
        InstallAction::Command(format!("brew install {formula}"))
    }

    fn create_shortcut(&self, request: &ShortcutRequest) -> Result<StepOutcome> {
        shortcut::write_start_script(request)?;
        Ok(StepOutcome::Success)
    }

    fn open_url_command(&self, url: &str) -> String {
        format!("open \"{url}\"")
    }
}

/// Linux and other Unix variants, driven by the detected package manager
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxStrategy {
    pub manager: Option<PackageManager>,
}

impl LinuxStrategy {
    fn packages(manager: PackageManager, tool: Tool) -> Option<&'static str> {
        match (manager, tool) {
            (_, Tool::Homebrew) => None,
            (PackageManager::Homebrew, Tool::Node) => Some("node"),
            (PackageManager::Homebrew, Tool::PostgreSql) => Some("postgresql@14"),
            (_, Tool::Node) => Some("nodejs npm"),
            (_, Tool::Git) => Some("git"),
            (PackageManager::Apt, Tool::PostgreSql) => Some("postgresql postgresql-contrib"),
            (PackageManager::Yum | PackageManager::Dnf, Tool::PostgreSql) => {
                Some("postgresql postgresql-server")
            }
        }
    }
}

impl PlatformStrategy for LinuxStrategy {
    fn family(&self) -> OsFamily {
        OsFamily::Linux
    }

    fn refresh_command(&self) -> Option<String> {
        match self.manager {
            Some(PackageManager::Apt) => Some("sudo apt-get update".to_string()),
            _ => None,
        }
    }

    fn install_action(&self, tool: Tool) -> InstallAction {
        let Some(manager) = self.manager else {
            return InstallAction::Manual(format!(
                "no supported package manager; please install {} manually",
                tool.display_name()
            ));
        };
        let Some(packages) = Self::packages(manager, tool) else {
            return InstallAction::Manual(format!(
                "{} cannot be installed with {manager}",
                tool.display_name()
            ));
        };
        let command = match manager {
            PackageManager::Apt => format!("sudo apt-get install -y {packages}"),
            PackageManager::Yum => format!("sudo yum install -y {packages}"),
            PackageManager::Dnf => format!("sudo dnf install -y {packages}"),
            PackageManager::Homebrew => format!("brew install {packages}"),
        };
        InstallAction::Command(command)
    }

    fn create_shortcut(&self, request: &ShortcutRequest) -> Result<StepOutcome> {
        shortcut::write_start_script(request)?;

        let Some(desktop) = request.desktop_dir.as_deref().filter(|d| d.is_dir()) else {
            tracing::info!("no desktop directory, skipping desktop entry");
            return Ok(StepOutcome::SkippedAlreadySatisfied);
        };
        let entry = shortcut::write_desktop_entry(request, desktop)?;
        tracing::info!(path = %entry.display(), "wrote desktop entry");
        Ok(StepOutcome::Success)
    }

    fn open_url_command(&self, url: &str) -> String {
        format!("xdg-open \"{url}\"")
    }
}
