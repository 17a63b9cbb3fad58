//! Zip extraction and directory replacement

use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{Result, source};

/// Extract a zip archive below `dest`, returning the number of entries written
///
/// Every entry name is checked before anything is written, so an archive with
/// an entry escaping `dest` leaves the destination untouched. Unix permission
/// bits recorded in the archive are restored.
pub fn extract_zip<R: Read + Seek>(reader: R, dest: &Path, label: &str) -> Result<usize> {
    let corrupt = |e: &dyn std::fmt::Display| source::extract_failed(label, e.to_string());

    let mut archive = zip::ZipArchive::new(reader).map_err(|e| corrupt(&e))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(|e| corrupt(&e))?;
        let Some(relative) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            return Err(source::unsafe_entry(entry.name()));
        };
        entries.push((index, relative));
    }

    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();
    for (index, relative) in &entries {
        let mut entry = archive.by_index(*index).map_err(|e| corrupt(&e))?;
        let out = dest.join(relative);
        let io_fail = |e: io::Error| source::extract_failed(label, format!("{}: {e}", out.display()));

        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(io_fail)?;
            if let Some(mode) = entry.unix_mode() {
                dir_modes.push((out.clone(), mode));
            }
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(io_fail)?;
        }
        let mut file = File::create(&out).map_err(io_fail)?;
        io::copy(&mut entry, &mut file).map_err(io_fail)?;
        if let Some(mode) = entry.unix_mode() {
            set_mode(&out, mode).map_err(io_fail)?;
        }
    }

    // Directories last, a read-only directory would block its own children
    for (dir, mode) in dir_modes.iter().rev() {
        set_mode(dir, mode | 0o700).map_err(|e| {
            source::extract_failed(label, format!("{}: {e}", dir.display()))
        })?;
    }

    tracing::debug!(entries = entries.len(), dest = %dest.display(), "extracted archive");
    Ok(entries.len())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Move `src` to `dest`, replacing whatever `dest` held
///
/// An existing `dest` is first renamed aside and only deleted once `src` is in
/// place. If the final rename fails the previous directory is put back.
pub fn replace_dir(src: &Path, dest: &Path) -> Result<()> {
    let failed = |e: io::Error| {
        source::replace_failed(
            src.display().to_string(),
            dest.display().to_string(),
            e.to_string(),
        )
    };

    if !dest.exists() {
        return fs::rename(src, dest).map_err(failed);
    }

    let backup = sibling_with_suffix(dest, ".replaced");
    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(failed)?;
    }
    fs::rename(dest, &backup).map_err(failed)?;

    if let Err(e) = fs::rename(src, dest) {
        if let Err(restore) = fs::rename(&backup, dest) {
            tracing::warn!(error = %restore, backup = %backup.display(), "could not restore previous directory");
        }
        return Err(failed(e));
    }

    if let Err(e) = fs::remove_dir_all(&backup) {
        tracing::warn!(error = %e, path = %backup.display(), "could not remove replaced directory");
    }
    Ok(())
}

/// `<parent>/<name><suffix>`
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}
