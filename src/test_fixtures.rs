//! Test doubles and fixtures shared by the unit tests.
//!
//! The pipeline talks to the outside world through three seams: the
//! [`CommandRunner`], the [`EventSink`] and the [`ArchiveFetcher`]. This module
//! provides scripted stand-ins for each so stages can be tested without
//! spawning processes or touching the network.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{CollectingSink, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new()
//!     .with_tools(["git", "node"])
//!     .with_failure("createdb", "database \"ars_database\" already exists");
//! let sink = CollectingSink::default();
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use crate::error::{Result, command, source};
use crate::events::{EventSink, InstallEvent};
use crate::runner::{CommandResult, CommandRunner};
use crate::source::ArchiveFetcher;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Initialize a git working copy at `path`, creating the directory.
///
/// # Panics
///
/// Panics if the directory or repository cannot be created.
pub fn init_working_copy(path: &Path) {
    std::fs::create_dir_all(path).expect("Failed to create working copy directory");
    git2::Repository::init(path).expect("Failed to init git repository");
}

/// Create test files below `base`.
///
/// Takes a list of (path, content) tuples; parent directories are created.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(base: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = base.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Build an in-memory zip archive.
///
/// Names ending in `/` become directory entries. Files get mode 0644.
#[must_use]
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let with_modes: Vec<_> = entries
        .iter()
        .map(|(name, content)| (*name, *content, 0o644))
        .collect();
    build_zip_with_modes(&with_modes)
}

/// Build an in-memory zip archive recording a Unix mode per entry.
///
/// # Panics
///
/// Panics if the archive cannot be written.
#[must_use]
pub fn build_zip_with_modes(entries: &[(&str, &str, u32)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content, mode) in entries {
        let options = SimpleFileOptions::default().unix_permissions(*mode);
        if name.ends_with('/') {
            zip.add_directory(*name, options)
                .expect("Failed to add directory entry");
        } else {
            zip.start_file(*name, options)
                .expect("Failed to start file entry");
            zip.write_all(content.as_bytes())
                .expect("Failed to write file entry");
        }
    }
    zip.finish().expect("Failed to finish archive").into_inner()
}

/// Event sink that records everything it receives
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<InstallEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<InstallEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                InstallEvent::Log(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Progress percentages in emission order
    pub fn percentages(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                InstallEvent::Progress(p) => Some(p.percentage),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: InstallEvent) {
        self.events.lock().unwrap().push(event);
    }
}

type Hook = Box<dyn Fn(&str, Option<&Path>) + Send + Sync>;

enum Response {
    Exit {
        status: i32,
        stdout: String,
        stderr: String,
    },
    SpawnError,
}

#[derive(Default)]
struct Recorded {
    tools: HashSet<String>,
    runs: Vec<(String, Option<PathBuf>)>,
    probed: Vec<String>,
    launched: Vec<(String, Option<PathBuf>)>,
}

/// Command runner driven by a script instead of real processes
///
/// Rules are matched by command prefix, first match wins. Commands without a
/// rule succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    recorded: Mutex<Recorded>,
    responses: Vec<(String, Response)>,
    installs: Vec<(String, String)>,
    hooks: Vec<(String, Hook)>,
    launch_fails: bool,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tools that answer `exists`
    pub fn with_tools<'a>(self, tools: impl IntoIterator<Item = &'a str>) -> Self {
        self.recorded
            .lock()
            .unwrap()
            .tools
            .extend(tools.into_iter().map(str::to_string));
        self
    }

    /// Commands starting with `prefix` exit 0 printing `stdout`
    pub fn with_output(mut self, prefix: &str, stdout: &str) -> Self {
        self.responses.push((
            prefix.to_string(),
            Response::Exit {
                status: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
        self
    }

    /// Commands starting with `prefix` exit 1 printing `stderr`
    pub fn with_failure(mut self, prefix: &str, stderr: &str) -> Self {
        self.responses.push((
            prefix.to_string(),
            Response::Exit {
                status: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    /// Commands starting with `prefix` cannot be spawned
    pub fn with_spawn_error(mut self, prefix: &str) -> Self {
        self.responses
            .push((prefix.to_string(), Response::SpawnError));
        self
    }

    /// A successful command starting with `prefix` makes `tool` available
    pub fn installing(mut self, prefix: &str, tool: &str) -> Self {
        self.installs.push((prefix.to_string(), tool.to_string()));
        self
    }

    /// Run `hook` whenever a command starting with `prefix` runs
    pub fn with_hook(
        mut self,
        prefix: &str,
        hook: impl Fn(&str, Option<&Path>) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push((prefix.to_string(), Box::new(hook)));
        self
    }

    pub fn with_launch_failure(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    /// Command lines passed to `run`, in order
    pub fn commands(&self) -> Vec<String> {
        self.runs().into_iter().map(|(cmd, _)| cmd).collect()
    }

    /// Command lines and working directories passed to `run`
    pub fn runs(&self) -> Vec<(String, Option<PathBuf>)> {
        self.recorded.lock().unwrap().runs.clone()
    }

    /// Tool names passed to `exists`, in order
    pub fn probed(&self) -> Vec<String> {
        self.recorded.lock().unwrap().probed.clone()
    }

    /// Command lines passed to `launch`
    pub fn launched(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .launched
            .iter()
            .map(|(cmd, _)| cmd.clone())
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command_line: &str, cwd: Option<&Path>) -> Result<CommandResult> {
        self.recorded
            .lock()
            .unwrap()
            .runs
            .push((command_line.to_string(), cwd.map(Path::to_path_buf)));

        for (prefix, hook) in &self.hooks {
            if command_line.starts_with(prefix.as_str()) {
                hook(command_line, cwd);
            }
        }

        let response = self
            .responses
            .iter()
            .find(|(prefix, _)| command_line.starts_with(prefix.as_str()))
            .map(|(_, response)| response);

        let result = match response {
            Some(Response::SpawnError) => {
                return Err(command::spawn_failed(command_line, "scripted spawn error"));
            }
            Some(Response::Exit {
                status,
                stdout,
                stderr,
            }) => CommandResult::new(command_line, Some(*status), stdout.as_str(), stderr.as_str()),
            None => CommandResult::new(command_line, Some(0), "", ""),
        };

        if result.success {
            let mut recorded = self.recorded.lock().unwrap();
            for (prefix, tool) in &self.installs {
                if command_line.starts_with(prefix.as_str()) {
                    recorded.tools.insert(tool.clone());
                }
            }
        }
        Ok(result)
    }

    fn exists(&self, tool: &str) -> bool {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.probed.push(tool.to_string());
        recorded.tools.contains(tool)
    }

    fn launch(&self, command_line: &str, cwd: Option<&Path>) -> Result<()> {
        self.recorded
            .lock()
            .unwrap()
            .launched
            .push((command_line.to_string(), cwd.map(Path::to_path_buf)));
        if self.launch_fails {
            return Err(command::spawn_failed(command_line, "scripted launch error"));
        }
        Ok(())
    }
}

/// Archive fetcher serving fixed bytes, or failing
pub struct StaticFetcher {
    body: Option<Vec<u8>>,
    urls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn serving(body: Vec<u8>) -> Self {
        Self {
            body: Some(body),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            body: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl ArchiveFetcher for StaticFetcher {
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        self.urls.lock().unwrap().push(url.to_string());
        let Some(body) = &self.body else {
            return Err(source::download_failed(url, "connection refused"));
        };
        out.write_all(body)?;
        Ok(body.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_runner_first_rule_wins() {
        let runner = ScriptedRunner::new()
            .with_failure("createdb", "already exists")
            .with_output("create", "unused");
        let result = runner.run("createdb ars_database", None).unwrap();
        assert_eq!(result.status, Some(1));
        assert_eq!(result.stderr, "already exists");

        let default = runner.run("yarn build", None).unwrap();
        assert!(default.success);
        assert_eq!(runner.commands(), vec!["createdb ars_database", "yarn build"]);
    }

    #[test]
    fn test_scripted_runner_install_effect() {
        let runner = ScriptedRunner::new().installing("sudo apt-get install -y git", "git");
        assert!(!runner.exists("git"));
        runner.run("sudo apt-get install -y git", None).unwrap();
        assert!(runner.exists("git"));
        assert_eq!(runner.probed(), vec!["git", "git"]);
    }

    #[test]
    fn test_build_zip_readable() {
        let bytes = build_zip(&[("root/", ""), ("root/a.txt", "hello")]);
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_collecting_sink_splits_events() {
        let sink = CollectingSink::default();
        sink.progress(10, "Installing dependencies...");
        sink.log("Running: true");
        assert_eq!(sink.percentages(), vec![10]);
        assert_eq!(sink.logs(), vec!["Running: true"]);
    }
}
