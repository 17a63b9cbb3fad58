//! External command errors

use super::InstallerError;

/// Creates a command execution failed error from an exit status and captured stderr
pub fn execution_failed(
    command: impl Into<String>,
    status: Option<i32>,
    stderr: impl Into<String>,
) -> InstallerError {
    InstallerError::CommandExecutionFailed {
        command: command.into(),
        status: status.map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit status {code}"),
        ),
        stderr: stderr.into(),
    }
}

/// Creates a command spawn failed error
pub fn spawn_failed(command: impl Into<String>, reason: impl Into<String>) -> InstallerError {
    InstallerError::CommandSpawnFailed {
        command: command.into(),
        reason: reason.into(),
    }
}
