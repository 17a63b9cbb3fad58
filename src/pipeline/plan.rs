//! What the user asked to install, fixed for the duration of a run

use std::path::{Path, PathBuf};

use normpath::PathExt;

use crate::error::{Result, fs as fs_error};

/// Installation request; immutable once the pipeline starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationPlan {
    /// Absolute installation directory
    pub target_dir: PathBuf,
    pub install_dependencies: bool,
    pub create_shortcuts: bool,
    pub launch_after_install: bool,
}

impl InstallationPlan {
    /// Plan with every optional stage enabled
    ///
    /// A relative `target_dir` is resolved against the current directory;
    /// an existing directory is normalized.
    pub fn new(target_dir: impl AsRef<Path>) -> Result<Self> {
        let target_dir = target_dir.as_ref();
        if target_dir.as_os_str().is_empty() {
            return Err(fs_error::invalid_target("", "path is empty"));
        }

        let absolute = std::path::absolute(target_dir).map_err(|e| {
            fs_error::invalid_target(target_dir.display().to_string(), e.to_string())
        })?;
        let target_dir = match absolute.normalize() {
            Ok(normalized) => normalized.into_path_buf(),
            Err(_) => absolute,
        };

        Ok(Self {
            target_dir,
            install_dependencies: true,
            create_shortcuts: true,
            launch_after_install: true,
        })
    }

    pub fn with_dependencies(mut self, enabled: bool) -> Self {
        self.install_dependencies = enabled;
        self
    }

    pub fn with_shortcuts(mut self, enabled: bool) -> Self {
        self.create_shortcuts = enabled;
        self
    }

    pub fn with_launch(mut self, enabled: bool) -> Self {
        self.launch_after_install = enabled;
        self
    }
}
