//! File system errors

use super::InstallerError;

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> InstallerError {
    InstallerError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid target directory error
pub fn invalid_target(path: impl Into<String>, reason: impl Into<String>) -> InstallerError {
    InstallerError::InvalidTargetDir {
        path: path.into(),
        reason: reason.into(),
    }
}
