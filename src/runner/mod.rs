//! External command execution
//!
//! This module handles:
//! - Running command lines through the host shell with full output capture
//! - Probing whether a tool is installed
//! - Launching long-running processes detached from the installer
//!
//! The runner never interprets exit codes. Callers decide whether a non-zero
//! status is fatal, recoverable or expected, using [`CommandResult::into_success`]
//! when they want the failure to propagate.

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::error::{Result, command};
use crate::events::EventSink;

/// Captured outcome of one command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Command line as given to the shell
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub success: bool,
}

impl CommandResult {
    pub fn new(
        command: impl Into<String>,
        status: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            status,
            success: status == Some(0),
        }
    }

    /// Treat a non-zero exit as fatal
    pub fn into_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(command::execution_failed(
                self.command,
                self.status,
                self.stderr.trim_end(),
            ))
        }
    }

    /// Case-insensitive search over both captured streams
    pub fn output_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.stdout.to_lowercase().contains(&needle) || self.stderr.to_lowercase().contains(&needle)
    }
}

/// Executes external commands on behalf of pipeline stages
pub trait CommandRunner: Send + Sync {
    /// Run `command_line` through the host shell and capture its output.
    ///
    /// Returns `Err` only when the shell itself cannot be started; a command
    /// that runs and fails still yields `Ok` with `success == false`.
    fn run(&self, command_line: &str, cwd: Option<&Path>) -> Result<CommandResult>;

    /// Whether `tool --version` runs successfully. Never fails.
    fn exists(&self, tool: &str) -> bool;

    /// Start `command_line` without waiting for it to finish
    fn launch(&self, command_line: &str, cwd: Option<&Path>) -> Result<()>;
}

/// Production runner using `sh -c` (Unix) or `cmd /C` (Windows)
pub struct ShellRunner {
    sink: Arc<dyn EventSink>,
}

impl ShellRunner {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    fn record(&self, result: &CommandResult) {
        let stdout = result.stdout.trim_end();
        let stderr = result.stderr.trim_end();
        if !stdout.is_empty() {
            self.sink.log(&format!("Output: {stdout}"));
        }
        if !stderr.is_empty() {
            self.sink.log(&format!("Error: {stderr}"));
        }
        tracing::debug!(
            command = %result.command,
            status = ?result.status,
            stdout = %stdout,
            stderr = %stderr,
            "command finished"
        );
    }
}

/// Build a `Command` that hands `command_line` to the platform shell
///
/// On Unix the child leads its own process group, so a Ctrl-C at the
/// terminal reaches only the installer and never the command in flight.
pub fn shell_command(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;

        // cmd.exe does its own quote parsing; pass the line through untouched
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").raw_arg(command_line);
        cmd
    }
    #[cfg(not(windows))]
    {
        use std::os::unix::process::CommandExt;

        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]).process_group(0);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str, cwd: Option<&Path>) -> Result<CommandResult> {
        self.sink.log(&format!("Running: {command_line}"));
        tracing::debug!(command = %command_line, cwd = ?cwd, "running command");

        let mut cmd = shell_command(command_line);
        cmd.stdin(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            self.sink.log(&format!("Error: {e}"));
            command::spawn_failed(command_line, e.to_string())
        })?;

        let result = CommandResult::new(
            command_line,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        self.record(&result);
        Ok(result)
    }

    fn exists(&self, tool: &str) -> bool {
        let found = Command::new(tool)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        tracing::debug!(tool, found, "probed tool");
        found
    }

    fn launch(&self, command_line: &str, cwd: Option<&Path>) -> Result<()> {
        self.sink.log(&format!("Starting: {command_line}"));

        let mut cmd = shell_command(command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| command::spawn_failed(command_line, e.to_string()))?;

        // Reap the child when it exits so it never lingers as a zombie
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}
