//! Installer configuration (config.yaml) data structures
//!
//! Every field carries a default, so an empty or partial file is valid and
//! only overrides what it names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};

/// Top-level installer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstallerConfig {
    /// Installation directory used when `--dir` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    pub app: AppConfig,
    pub environment: EnvironmentConfig,
    pub database: DatabaseConfig,
    pub shortcut: ShortcutConfig,
    pub network: NetworkConfig,
}

/// The application being installed and where it comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display name, also used for the desktop entry file name
    pub name: String,
    pub repository: String,
    pub branch: String,
    /// Snapshot archive downloaded when git is unavailable
    pub archive_url: String,
    /// File name of the temporary archive inside the target directory
    pub archive_file: String,
    /// Canonical application directory below the target directory
    pub directory: String,
    /// Root directory inside the snapshot archive
    pub archive_root: String,
    /// Node project directory below the canonical directory
    pub app_subdir: String,
    /// Address the application serves on once started
    pub url: String,
    pub start_script: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Audience Response System".to_string(),
            repository: "https://github.com/benny2744/ARS-BZ.git".to_string(),
            branch: "main".to_string(),
            archive_url: "https://github.com/benny2744/ARS-BZ/archive/main.zip".to_string(),
            archive_file: "ars-main.zip".to_string(),
            directory: "ARS-BZ".to_string(),
            archive_root: "ARS-BZ-main".to_string(),
            app_subdir: "app".to_string(),
            url: "http://localhost:3000".to_string(),
            start_script: "start-ars.sh".to_string(),
        }
    }
}

impl AppConfig {
    /// `<target>/<directory>`
    pub fn canonical_dir(&self, target: &Path) -> PathBuf {
        target.join(&self.directory)
    }

    /// `<target>/<directory>/<app_subdir>`
    pub fn app_dir(&self, target: &Path) -> PathBuf {
        self.canonical_dir(target).join(&self.app_subdir)
    }
}

/// Values written to the application's `.env`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub database_url: String,
    pub nextauth_url: String,
    pub nextauth_secret: String,
    pub node_env: String,
    /// Upload limit in bytes
    pub max_file_size: u64,
    pub allowed_file_types: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://postgres@localhost:5432/ars_database".to_string(),
            nextauth_url: "http://localhost:3000".to_string(),
            nextauth_secret: "your-generated-secret-key-here-change-this-in-production"
                .to_string(),
            node_env: "production".to_string(),
            max_file_size: 10_485_760,
            allowed_file_types: ".jpg,.jpeg,.png,.gif,.pdf,.doc,.docx".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "ars_database".to_string(),
        }
    }
}

/// Desktop entry metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    pub comment: String,
    pub categories: Vec<String>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            comment: "Interactive audience response system".to_string(),
            categories: vec!["Network".to_string(), "Education".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout for the archive download, in seconds
    pub download_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            download_timeout_secs: 300,
        }
    }
}

impl NetworkConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl InstallerConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("app.directory", &self.app.directory),
            ("app.archive_root", &self.app.archive_root),
            ("app.archive_file", &self.app.archive_file),
            ("app.start_script", &self.app.start_script),
        ] {
            if !is_plain_name(value) {
                return Err(config::invalid(format!(
                    "{field} must be a plain directory or file name, got '{value}'"
                )));
            }
        }
        if self.app.app_subdir.is_empty() || Path::new(&self.app.app_subdir).is_absolute() {
            return Err(config::invalid(
                "app.app_subdir must be a relative path".to_string(),
            ));
        }
        if self.app.repository.trim().is_empty() {
            return Err(config::invalid("app.repository must not be empty"));
        }
        if self.database.name.trim().is_empty() {
            return Err(config::invalid("database.name must not be empty"));
        }
        if self.network.download_timeout_secs == 0 {
            return Err(config::invalid(
                "network.download_timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn is_plain_name(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && !value.contains(['/', '\\'])
}
