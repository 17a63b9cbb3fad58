//! Installer configuration
//!
//! This module contains:
//! - `installer.rs` - `InstallerConfig` and its sections, all defaulted
//! - `loader.rs` - Locating and parsing `config.yaml`

pub mod installer;
pub mod loader;

// Re-export commonly used types
pub use installer::{AppConfig, DatabaseConfig, EnvironmentConfig, InstallerConfig};
pub use loader::{default_config_path, default_install_dir, desktop_dir, load};
