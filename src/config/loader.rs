//! Locating and loading the installer configuration
//!
//! Lookup order:
//! 1. An explicit path (`--config` or `ARS_INSTALLER_CONFIG`); it must exist
//! 2. `<config dir>/ars-installer/config.yaml`, when present
//! 3. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result, config};

use super::InstallerConfig;

/// Directory below the platform config dir holding `config.yaml`
const CONFIG_DIR_NAME: &str = "ars-installer";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default installation directory name below the home directory
const DEFAULT_INSTALL_DIR: &str = "AudienceResponseSystem";

/// Per-user configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the effective configuration
pub fn load(explicit: Option<&Path>) -> Result<InstallerConfig> {
    load_from(explicit, default_config_path().as_deref())
}

/// Load from an explicit path or a fallback location
pub fn load_from(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<InstallerConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(config::not_found(path.display().to_string()));
        }
        return read_file(path);
    }

    match fallback {
        Some(path) if path.is_file() => read_file(path),
        _ => {
            tracing::debug!("no configuration file, using defaults");
            Ok(InstallerConfig::default())
        }
    }
}

fn read_file(path: &Path) -> Result<InstallerConfig> {
    tracing::debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(path)
        .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;
    InstallerConfig::from_yaml(&content).map_err(|e| match e {
        InstallerError::ConfigParseFailed { reason, .. } => {
            config::parse_failed(path.display().to_string(), reason)
        }
        other => other,
    })
}

/// `<home>/AudienceResponseSystem`
pub fn default_install_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_INSTALL_DIR))
        .ok_or(InstallerError::HomeDirNotFound)
}

/// The user's desktop folder, falling back to `<home>/Desktop`
pub fn desktop_dir() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
}
