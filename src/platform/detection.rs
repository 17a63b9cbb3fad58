//! Host platform detection
//!
//! Detection runs once per installer run. Apart from `--version` probes for
//! package managers it has no side effects; everything that mutates the host
//! lives in the provisioner.

use crate::runner::CommandRunner;

use super::{APPLICATION_TOOLS, OsFamily, PackageManager, PlatformProfile, Tool};

/// Detect the profile of the machine the installer runs on
pub fn detect(runner: &dyn CommandRunner) -> PlatformProfile {
    detect_for(std::env::consts::OS, runner)
}

/// Derive a profile for the given OS identifier
///
/// On Linux the first package manager from [`PackageManager::LINUX_PRIORITY`]
/// that answers `--version` wins.
pub fn detect_for(os: &str, runner: &dyn CommandRunner) -> PlatformProfile {
    let family = OsFamily::from_identifier(os);

    let profile = match family {
        OsFamily::Windows => PlatformProfile::new(family, None).with_tools(APPLICATION_TOOLS),
        OsFamily::MacOs => PlatformProfile::new(family, Some(PackageManager::Homebrew))
            .with_tool(Tool::Homebrew)
            .with_tools(APPLICATION_TOOLS),
        OsFamily::Linux => {
            let manager = PackageManager::LINUX_PRIORITY
                .into_iter()
                .find(|pm| runner.exists(pm.probe()));
            PlatformProfile::new(family, manager).with_tools(APPLICATION_TOOLS)
        }
    };

    tracing::info!(os, profile = %profile, "detected platform");
    profile
}
