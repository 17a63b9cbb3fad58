//! Background installation runs
//!
//! [`Installer::start`] moves the pipeline onto a worker thread and hands back
//! a [`RunHandle`] carrying the event receiver and the worker's join handle.
//! The caller owns the [`CancelToken`], so it can be wired to signal handlers
//! before the run begins. One installer allows a single active run at a time.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::events::{ChannelSink, EventSink, InstallEvent};
use crate::platform::PlatformProfile;
use crate::runner::{CommandRunner, ShellRunner};
use crate::source::ArchiveFetcher;

use super::cancel::CancelToken;
use super::orchestrator::{InstallReport, Orchestrator, Services};
use super::plan::InstallationPlan;

/// Builds the command runner for a run, bound to that run's event sink
pub type RunnerFactory =
    Arc<dyn Fn(Arc<dyn EventSink>) -> Arc<dyn CommandRunner> + Send + Sync>;

/// Runner factory for real shell commands
pub fn shell_runner_factory() -> RunnerFactory {
    Arc::new(|sink| Arc::new(ShellRunner::new(sink)) as Arc<dyn CommandRunner>)
}

/// Clears the single-run flag when the worker ends, even by panic
struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Starts installation runs on a background thread
pub struct Installer {
    config: Arc<InstallerConfig>,
    profile: Arc<PlatformProfile>,
    fetcher: Arc<dyn ArchiveFetcher>,
    runner_factory: RunnerFactory,
    desktop_dir: Option<PathBuf>,
    running: Arc<AtomicBool>,
}

impl Installer {
    pub fn new(
        config: InstallerConfig,
        profile: PlatformProfile,
        fetcher: Arc<dyn ArchiveFetcher>,
        runner_factory: RunnerFactory,
    ) -> Self {
        Self {
            config: Arc::new(config),
            profile: Arc::new(profile),
            fetcher,
            runner_factory,
            desktop_dir: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Desktop folder used for the shortcut stage
    pub fn with_desktop_dir(mut self, desktop_dir: Option<PathBuf>) -> Self {
        self.desktop_dir = desktop_dir;
        self
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start a run for `plan`, observing `cancel` between stages
    ///
    /// Fails with [`InstallerError::RunInProgress`] while a previous run's
    /// worker is still alive.
    pub fn start(&self, plan: InstallationPlan, cancel: CancelToken) -> Result<RunHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(InstallerError::RunInProgress);
        }
        let guard = RunGuard {
            running: Arc::clone(&self.running),
        };

        let (sender, events) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelSink::new(sender));
        let runner = (self.runner_factory)(Arc::clone(&sink));

        let config = Arc::clone(&self.config);
        let profile = Arc::clone(&self.profile);
        let fetcher = Arc::clone(&self.fetcher);
        let desktop_dir = self.desktop_dir.clone();

        let worker = thread::Builder::new()
            .name("ars-installer-pipeline".to_string())
            .spawn(move || {
                let _guard = guard;
                let services = Services {
                    runner: runner.as_ref(),
                    fetcher: fetcher.as_ref(),
                    sink: sink.as_ref(),
                };
                Orchestrator::new(&plan, &config, &profile, services)
                    .with_cancel(cancel)
                    .with_desktop_dir(desktop_dir)
                    .run()
            })?;

        Ok(RunHandle { events, worker })
    }
}

/// Handle to a run in progress
pub struct RunHandle {
    events: Receiver<InstallEvent>,
    worker: JoinHandle<InstallReport>,
}

impl RunHandle {
    /// Events in emission order; the stream ends after `Finished`
    pub fn events(&self) -> &Receiver<InstallEvent> {
        &self.events
    }

    /// Wait for the worker and return its report
    pub fn wait(self) -> Result<InstallReport> {
        self.worker
            .join()
            .map_err(|_| InstallerError::WorkerPanicked)
    }
}
