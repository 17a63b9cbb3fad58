//! Application environment and database setup
//!
//! This module handles:
//! - Installing the Node package dependencies (`yarn`, then the project's own)
//! - Writing the application's `.env`
//! - Creating the database and applying migrations and seed data
//!
//! Every command here is fatal on failure except `createdb` reporting that
//! the database already exists.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DatabaseConfig, EnvironmentConfig};
use crate::error::{Result, command, fs as fs_error};
use crate::events::EventSink;
use crate::outcome::{StepOutcome, fatal_on_error};
use crate::runner::CommandRunner;

/// Output fragment `createdb` prints when the database is already there
const ALREADY_EXISTS: &str = "already exists";

/// Rendered contents of the application's `.env`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(&'static str, String)>,
}

impl EnvFile {
    pub fn from_config(env: &EnvironmentConfig) -> Self {
        Self {
            entries: vec![
                ("DATABASE_URL", quoted(&env.database_url)),
                ("NEXTAUTH_URL", quoted(&env.nextauth_url)),
                ("NEXTAUTH_SECRET", quoted(&env.nextauth_secret)),
                ("NODE_ENV", quoted(&env.node_env)),
                ("MAX_FILE_SIZE", env.max_file_size.to_string()),
                ("ALLOWED_FILE_TYPES", quoted(&env.allowed_file_types)),
            ],
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// File contents, grouped the way the application documents them
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut section = "";
        for (key, value) in &self.entries {
            let heading = match *key {
                "DATABASE_URL" => "Database Configuration",
                "NEXTAUTH_URL" | "NEXTAUTH_SECRET" => "NextAuth Configuration",
                "NODE_ENV" => "Environment",
                _ => "File Upload Settings",
            };
            if heading != section {
                if !section.is_empty() {
                    out.push('\n');
                }
                let _ = writeln!(out, "# {heading}");
                section = heading;
            }
            let _ = writeln!(out, "{key}={value}");
        }
        out
    }

    /// Write to `<app_dir>/.env`, replacing any existing file
    pub fn write(&self, app_dir: &Path) -> Result<PathBuf> {
        let path = app_dir.join(".env");
        fs::write(&path, self.render())
            .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))?;
        Ok(path)
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Prepares the installed application to run
pub struct EnvironmentConfigurator<'a> {
    runner: &'a dyn CommandRunner,
    sink: &'a dyn EventSink,
    environment: &'a EnvironmentConfig,
    database: &'a DatabaseConfig,
}

impl<'a> EnvironmentConfigurator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        sink: &'a dyn EventSink,
        environment: &'a EnvironmentConfig,
        database: &'a DatabaseConfig,
    ) -> Self {
        Self {
            runner,
            sink,
            environment,
            database,
        }
    }

    pub fn configure(&self, app_dir: &Path) -> StepOutcome {
        fatal_on_error(self.try_configure(app_dir))
    }

    fn try_configure(&self, app_dir: &Path) -> Result<StepOutcome> {
        self.sink.log("Installing Node.js dependencies...");
        self.required("npm install -g yarn", app_dir)?;
        self.required("yarn install", app_dir)?;

        let env_path = EnvFile::from_config(self.environment).write(app_dir)?;
        tracing::info!(path = %env_path.display(), "wrote environment file");

        self.sink.log("Initializing database...");
        self.create_database(app_dir)?;

        self.required("npx prisma migrate deploy", app_dir)?;
        self.required("npx prisma db seed", app_dir)?;
        Ok(StepOutcome::Success)
    }

    /// `createdb`, tolerating only an already existing database
    pub fn create_database(&self, app_dir: &Path) -> Result<StepOutcome> {
        let command_line = format!("createdb {}", self.database.name);
        let result = self.runner.run(&command_line, Some(app_dir))?;
        if result.success {
            return Ok(StepOutcome::Success);
        }
        if result.output_contains(ALREADY_EXISTS) {
            self.sink
                .log(&format!("Database {} already exists", self.database.name));
            return Ok(StepOutcome::SkippedAlreadySatisfied);
        }
        Err(command::execution_failed(
            result.command,
            result.status,
            result.stderr.trim_end(),
        ))
    }

    fn required(&self, command_line: &str, cwd: &Path) -> Result<()> {
        self.runner.run(command_line, Some(cwd))?.into_success()?;
        Ok(())
    }
}
