//! Staged installation run
//!
//! Runs the stages in order on the calling thread, emitting an entry and an
//! exit checkpoint per stage. A fatal outcome ends the run immediately,
//! recoverable ones are logged and the run goes on. Cancellation is only
//! observed between stages.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::configure::EnvironmentConfigurator;
use crate::error::{Result, fs as fs_error};
use crate::events::{EventSink, InstallEvent, TerminalState};
use crate::outcome::{StepOutcome, fatal_on_error};
use crate::platform::shortcut::ShortcutRequest;
use crate::platform::{PlatformProfile, PlatformStrategy, select_strategy};
use crate::provision::{DependencyProvisioner, ToolOutcome, summarize};
use crate::runner::CommandRunner;
use crate::source::{ArchiveFetcher, SourceAcquirer};

use super::cancel::CancelToken;
use super::plan::InstallationPlan;
use super::stage::{PipelineState, Stage};

const BUILD_COMMAND: &str = "yarn build";

/// What happened during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub state: TerminalState,
    /// Outcome of every stage that ran, in order
    pub stages: Vec<(Stage, StepOutcome)>,
    /// Per-tool outcomes from dependency provisioning
    pub tools: Vec<ToolOutcome>,
}

impl InstallReport {
    fn new() -> Self {
        Self {
            state: TerminalState::Completed,
            stages: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn outcome_of(&self, stage: Stage) -> Option<&StepOutcome> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| outcome)
    }

    /// Recoverable failures worth showing the user after the run
    pub fn warnings(&self) -> Vec<String> {
        self.stages
            .iter()
            .filter_map(|(stage, outcome)| match outcome {
                StepOutcome::RecoverableFailure(reason) => Some(format!("{stage}: {reason}")),
                _ => None,
            })
            .collect()
    }
}

/// Emits progress, never letting the percentage go backwards
struct ProgressTracker<'a> {
    sink: &'a dyn EventSink,
    last: u8,
}

impl<'a> ProgressTracker<'a> {
    fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink, last: 0 }
    }

    fn emit(&mut self, percentage: u8, message: &str) {
        self.last = percentage.max(self.last);
        self.sink.progress(self.last, message);
    }
}

/// External collaborators of a run
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub runner: &'a dyn CommandRunner,
    pub fetcher: &'a dyn ArchiveFetcher,
    pub sink: &'a dyn EventSink,
}

/// Drives one installation run
pub struct Orchestrator<'a> {
    plan: &'a InstallationPlan,
    config: &'a InstallerConfig,
    profile: &'a PlatformProfile,
    strategy: Box<dyn PlatformStrategy>,
    services: Services<'a>,
    cancel: CancelToken,
    desktop_dir: Option<PathBuf>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        plan: &'a InstallationPlan,
        config: &'a InstallerConfig,
        profile: &'a PlatformProfile,
        services: Services<'a>,
    ) -> Self {
        Self {
            plan,
            config,
            profile,
            strategy: select_strategy(profile),
            services,
            cancel: CancelToken::new(),
            desktop_dir: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_desktop_dir(mut self, desktop_dir: Option<PathBuf>) -> Self {
        self.desktop_dir = desktop_dir;
        self
    }

    fn app_dir(&self) -> PathBuf {
        self.config.app.app_dir(&self.plan.target_dir)
    }

    fn is_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::ProvisionDependencies => self.plan.install_dependencies,
            Stage::CreateShortcuts => self.plan.create_shortcuts,
            Stage::Launch => self.plan.launch_after_install,
            _ => true,
        }
    }

    /// Run every enabled stage; the last event emitted is always `Finished`
    pub fn run(&mut self) -> InstallReport {
        let sink = self.services.sink;
        let mut tracker = ProgressTracker::new(sink);
        let mut report = InstallReport::new();

        tracing::info!(
            target_dir = %self.plan.target_dir.display(),
            profile = %self.profile,
            strategy = %self.strategy.family(),
            "installation started"
        );
        if let Some(StepOutcome::RecoverableFailure(note)) = self.profile.detection_outcome() {
            sink.log(&format!("Warning: {note}"));
        }

        let mut state = PipelineState::NotStarted;
        for stage in Stage::ALL {
            if !self.is_enabled(stage) {
                tracing::debug!(%stage, "stage disabled");
                continue;
            }
            if self.cancel.is_cancelled() {
                tracing::info!(%stage, previous = ?state, "cancelled before stage");
                return self.finish(report, PipelineState::Cancelled);
            }

            state = PipelineState::Running(stage);
            let (entry, exit) = stage.checkpoints();
            tracker.emit(entry, stage.entry_message());

            let outcome = self.run_stage(stage, &mut report);
            tracing::info!(%stage, %outcome, "stage finished");
            let next = PipelineState::after(stage, &outcome);

            match &outcome {
                StepOutcome::FatalFailure(reason) => sink.log(&format!("ERROR: {reason}")),
                StepOutcome::RecoverableFailure(reason) => {
                    tracing::warn!(%stage, reason = %reason, "continuing after failure");
                    sink.log(&format!("Warning: {reason}"));
                }
                StepOutcome::Success | StepOutcome::SkippedAlreadySatisfied => {}
            }
            report.stages.push((stage, outcome));

            if next.is_terminal() {
                return self.finish(report, next);
            }
            tracker.emit(exit, &self.exit_message(stage));
        }

        tracker.emit(100, &TerminalState::Completed.to_string());
        self.finish(report, PipelineState::Completed)
    }

    fn finish(&self, mut report: InstallReport, state: PipelineState) -> InstallReport {
        let terminal = match &state {
            PipelineState::Cancelled => TerminalState::Cancelled,
            PipelineState::Failed(reason) => TerminalState::Failed(reason.clone()),
            _ => TerminalState::Completed,
        };
        self.services
            .sink
            .emit(InstallEvent::Finished(terminal.clone()));
        report.state = terminal;
        report
    }

    fn exit_message(&self, stage: Stage) -> String {
        match stage {
            Stage::CreateTargetDir => format!(
                "{}: {}",
                stage.exit_message(),
                self.plan.target_dir.display()
            ),
            _ => stage.exit_message().to_string(),
        }
    }

    fn run_stage(&self, stage: Stage, report: &mut InstallReport) -> StepOutcome {
        let Services {
            runner,
            fetcher,
            sink,
        } = self.services;

        match stage {
            Stage::CreateTargetDir => fatal_on_error(create_target_dir(&self.plan.target_dir)),
            Stage::ProvisionDependencies => {
                let tools = DependencyProvisioner::new(runner, sink)
                    .ensure(self.profile, self.strategy.as_ref());
                for tool in &tools {
                    sink.log(&tool.to_string());
                }
                let outcome = summarize(&tools);
                report.tools = tools;
                outcome
            }
            Stage::AcquireSource => {
                SourceAcquirer::new(runner, fetcher, sink, &self.config.app)
                    .acquire(&self.plan.target_dir)
            }
            Stage::ConfigureEnvironment => EnvironmentConfigurator::new(
                runner,
                sink,
                &self.config.environment,
                &self.config.database,
            )
            .configure(&self.app_dir()),
            Stage::Build => fatal_on_error(self.build()),
            Stage::CreateShortcuts => self.create_shortcuts(),
            Stage::Launch => self.launch(),
        }
    }

    fn build(&self) -> Result<StepOutcome> {
        self.services
            .runner
            .run(BUILD_COMMAND, Some(&self.app_dir()))?
            .into_success()?;
        Ok(StepOutcome::Success)
    }

    fn shortcut_request(&self) -> ShortcutRequest {
        let app = &self.config.app;
        ShortcutRequest {
            install_dir: self.plan.target_dir.clone(),
            app_dir: self.app_dir(),
            app_name: app.name.clone(),
            comment: self.config.shortcut.comment.clone(),
            categories: self.config.shortcut.categories.clone(),
            start_script_name: app.start_script.clone(),
            start_command: self.strategy.start_command().to_string(),
            desktop_dir: self.desktop_dir.clone(),
        }
    }

    fn create_shortcuts(&self) -> StepOutcome {
        match self.strategy.create_shortcut(&self.shortcut_request()) {
            Ok(outcome) => outcome,
            Err(e) => StepOutcome::recoverable(e.to_string()),
        }
    }

    /// Start the server detached, then open it in the browser
    fn launch(&self) -> StepOutcome {
        let runner = self.services.runner;
        let start = self.strategy.start_command();
        if let Err(e) = runner.launch(start, Some(&self.app_dir())) {
            return StepOutcome::recoverable(e.to_string());
        }

        let open = self.strategy.open_url_command(&self.config.app.url);
        match runner.run(&open, None) {
            Ok(result) if result.success => StepOutcome::Success,
            Ok(result) => StepOutcome::recoverable(format!(
                "could not open {}: {}",
                self.config.app.url,
                result.stderr.trim()
            )),
            Err(e) => StepOutcome::recoverable(e.to_string()),
        }
    }
}

/// Create the installation directory; an existing one is left as is
fn create_target_dir(path: &Path) -> Result<StepOutcome> {
    if path.is_dir() {
        return Ok(StepOutcome::SkippedAlreadySatisfied);
    }
    if path.exists() {
        return Err(fs_error::invalid_target(
            path.display().to_string(),
            "exists and is not a directory",
        ));
    }
    fs::create_dir_all(path)
        .map_err(|e| fs_error::invalid_target(path.display().to_string(), e.to_string()))?;
    Ok(StepOutcome::Success)
}
