//! Start script and desktop entry generation

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, fs as fs_error};

/// Everything a strategy needs to register the application with the desktop
#[derive(Debug, Clone)]
pub struct ShortcutRequest {
    /// Installation directory chosen by the user
    pub install_dir: PathBuf,
    /// Directory the start command runs in
    pub app_dir: PathBuf,
    pub app_name: String,
    pub comment: String,
    pub categories: Vec<String>,
    /// File name of the start script, created inside `install_dir`
    pub start_script_name: String,
    pub start_command: String,
    /// Desktop folder, if the host has one
    pub desktop_dir: Option<PathBuf>,
}

impl ShortcutRequest {
    pub fn start_script_path(&self) -> PathBuf {
        self.install_dir.join(&self.start_script_name)
    }

    pub fn desktop_entry_path(&self, desktop_dir: &Path) -> PathBuf {
        desktop_dir.join(format!("{}.desktop", self.app_name))
    }
}

/// Render a freedesktop.org desktop entry launching the start script
pub fn desktop_entry(request: &ShortcutRequest) -> String {
    let categories: String = request
        .categories
        .iter()
        .map(|c| format!("{c};"))
        .collect();
    format!(
        "[Desktop Entry]\n\
         Version=1.0\n\
         Type=Application\n\
         Name={name}\n\
         Comment={comment}\n\
         Exec={exec}\n\
         Terminal=true\n\
         Categories={categories}\n",
        name = request.app_name,
        comment = request.comment,
        exec = request.start_script_path().display(),
    )
}

/// Render the POSIX start script
pub fn start_script(request: &ShortcutRequest) -> String {
    format!(
        "#!/bin/sh\ncd \"{}\" || exit 1\nexec {}\n",
        request.app_dir.display(),
        request.start_command
    )
}

/// Write the start script into the installation directory and mark it executable
pub fn write_start_script(request: &ShortcutRequest) -> Result<PathBuf> {
    let path = request.start_script_path();
    write_executable(&path, &start_script(request))?;
    Ok(path)
}

/// Write the desktop entry into `desktop_dir` and mark it executable
pub fn write_desktop_entry(request: &ShortcutRequest, desktop_dir: &Path) -> Result<PathBuf> {
    let path = request.desktop_entry_path(desktop_dir);
    write_executable(&path, &desktop_entry(request))?;
    Ok(path)
}

fn write_executable(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))?;
    make_executable(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
