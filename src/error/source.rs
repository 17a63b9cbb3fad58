//! Source acquisition errors

use super::InstallerError;

/// Creates a download failed error
pub fn download_failed(url: impl Into<String>, reason: impl Into<String>) -> InstallerError {
    InstallerError::DownloadFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates an archive extraction error
pub fn extract_failed(path: impl Into<String>, reason: impl Into<String>) -> InstallerError {
    InstallerError::ExtractFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an unsafe archive entry error
pub fn unsafe_entry(entry: impl Into<String>) -> InstallerError {
    InstallerError::UnsafeArchiveEntry {
        entry: entry.into(),
    }
}

/// Creates a directory replace error
pub fn replace_failed(
    from: impl Into<String>,
    to: impl Into<String>,
    reason: impl Into<String>,
) -> InstallerError {
    InstallerError::ReplaceDirFailed {
        from: from.into(),
        to: to.into(),
        reason: reason.into(),
    }
}
