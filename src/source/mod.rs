//! Application source acquisition
//!
//! The source is fetched with git when the client is installed, otherwise a
//! snapshot archive is downloaded and extracted.
//!
//! ## Module Organization
//!
//! - `download.rs`: `ArchiveFetcher` trait and the HTTP implementation
//! - `archive.rs`: Zip extraction and atomic directory replacement

pub mod archive;
pub mod download;

use std::path::Path;

pub use download::{ArchiveFetcher, HttpFetcher};

use crate::config::AppConfig;
use crate::error::{Result, source};
use crate::events::EventSink;
use crate::outcome::{StepOutcome, fatal_on_error};
use crate::runner::CommandRunner;

/// Whether `path` is the root of a git working copy
pub fn is_working_copy(path: &Path) -> bool {
    git2::Repository::open(path).is_ok()
}

/// Places the application source at `<target>/<canonical>`
pub struct SourceAcquirer<'a> {
    runner: &'a dyn CommandRunner,
    fetcher: &'a dyn ArchiveFetcher,
    sink: &'a dyn EventSink,
    app: &'a AppConfig,
}

impl<'a> SourceAcquirer<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn ArchiveFetcher,
        sink: &'a dyn EventSink,
        app: &'a AppConfig,
    ) -> Self {
        Self {
            runner,
            fetcher,
            sink,
            app,
        }
    }

    /// Fetch or update the source below `target`; every failure is fatal
    pub fn acquire(&self, target: &Path) -> StepOutcome {
        let result = if self.runner.exists("git") {
            self.sink.log("Cloning repository...");
            self.acquire_with_git(target)
        } else {
            self.sink.log("Git not found, downloading archive...");
            self.acquire_archive(target)
        };
        fatal_on_error(result)
    }

    fn acquire_with_git(&self, target: &Path) -> Result<StepOutcome> {
        let canonical = self.app.canonical_dir(target);

        if is_working_copy(&canonical) {
            let command = format!(
                "git -C \"{}\" pull origin {}",
                canonical.display(),
                self.app.branch
            );
            self.runner.run(&command, None)?.into_success()?;
            return Ok(StepOutcome::Success);
        }

        if !canonical.exists() {
            self.clone_into(&canonical)?;
            return Ok(StepOutcome::Success);
        }

        // Left behind by an archive install: clone next to it, then swap
        tracing::info!(path = %canonical.display(), "replacing non-git application directory");
        let staging = archive::sibling_with_suffix(&canonical, ".staging");
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        self.clone_into(&staging)?;
        archive::replace_dir(&staging, &canonical)?;
        Ok(StepOutcome::Success)
    }

    fn clone_into(&self, dir: &Path) -> Result<()> {
        let command = format!("git clone {} \"{}\"", self.app.repository, dir.display());
        self.runner.run(&command, None)?.into_success()?;
        Ok(())
    }

    fn acquire_archive(&self, target: &Path) -> Result<StepOutcome> {
        let url = &self.app.archive_url;
        self.sink.log(&format!("Downloading {url}"));
        let mut archive_file =
            download::download_to_temp(self.fetcher, url, target, &self.app.archive_file)?;

        // Entries outside the archive root never reach the target directory
        let staging = tempfile::Builder::new()
            .prefix(".ars-extract-")
            .tempdir_in(target)
            .map_err(|e| source::extract_failed(target.display().to_string(), e.to_string()))?;

        let label = archive_file.path().display().to_string();
        archive::extract_zip(archive_file.as_file_mut(), staging.path(), &label)?;
        let extracted = staging.path().join(&self.app.archive_root);
        if !extracted.is_dir() {
            return Err(source::extract_failed(
                label,
                format!("archive has no '{}' directory", self.app.archive_root),
            ));
        }

        archive::replace_dir(&extracted, &self.app.canonical_dir(target))?;
        // staging and archive_file drop here and remove what is left
        Ok(StepOutcome::Success)
    }
}

#[cfg(test)]
mod tests;
