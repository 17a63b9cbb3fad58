//! System dependency provisioning
//!
//! This module handles:
//! - Checking each required tool with an `exists` probe
//! - Running the strategy's install command for missing tools
//! - Summarising per-tool outcomes into a single stage outcome
//!
//! A failure for one tool never stops the others. Re-running on a host where
//! every tool is present runs no installer and no package index refresh.

use std::fmt;

use crate::events::EventSink;
use crate::outcome::StepOutcome;
use crate::platform::{InstallAction, PlatformProfile, PlatformStrategy, Tool};
use crate::runner::CommandRunner;

/// Outcome for one required tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub tool: Tool,
    pub outcome: StepOutcome,
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tool, self.outcome)
    }
}

/// Installs missing system tools through a [`PlatformStrategy`]
pub struct DependencyProvisioner<'a> {
    runner: &'a dyn CommandRunner,
    sink: &'a dyn EventSink,
}

impl<'a> DependencyProvisioner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sink: &'a dyn EventSink) -> Self {
        Self { runner, sink }
    }

    /// Ensure every tool of `profile` is present, in declared order
    pub fn ensure(
        &self,
        profile: &PlatformProfile,
        strategy: &dyn PlatformStrategy,
    ) -> Vec<ToolOutcome> {
        let mut refreshed = false;
        profile
            .required_tools
            .iter()
            .map(|&tool| ToolOutcome {
                tool,
                outcome: self.ensure_tool(tool, strategy, &mut refreshed),
            })
            .collect()
    }

    fn ensure_tool(
        &self,
        tool: Tool,
        strategy: &dyn PlatformStrategy,
        refreshed: &mut bool,
    ) -> StepOutcome {
        if self.runner.exists(tool.probe()) {
            tracing::debug!(%tool, "already installed");
            return StepOutcome::SkippedAlreadySatisfied;
        }

        let command = match strategy.install_action(tool) {
            InstallAction::Manual(guidance) => {
                self.sink.log(&guidance);
                return StepOutcome::RecoverableFailure(guidance);
            }
            InstallAction::Command(command) => command,
        };

        if !*refreshed {
            *refreshed = true;
            if let Some(refresh) = strategy.refresh_command() {
                self.refresh(&refresh);
            }
        }

        self.sink.log(&format!("Installing {tool}..."));
        let result = match self.runner.run(&command, None) {
            Ok(result) => result,
            Err(e) => return StepOutcome::recoverable(e.to_string()),
        };
        if !result.success {
            let stderr = result.stderr.trim();
            tracing::warn!(%tool, status = ?result.status, "installer failed");
            return StepOutcome::recoverable(format!("{tool} installation failed: {stderr}"));
        }

        if self.runner.exists(tool.probe()) {
            StepOutcome::Success
        } else {
            StepOutcome::recoverable(format!(
                "{tool} is still not available after installation"
            ))
        }
    }

    fn refresh(&self, command: &str) {
        match self.runner.run(command, None) {
            Ok(result) if result.success => {}
            Ok(result) => {
                tracing::warn!(status = ?result.status, "package index refresh failed");
            }
            Err(e) => tracing::warn!(error = %e, "package index refresh failed"),
        }
    }
}

/// Collapse per-tool outcomes into the stage outcome
///
/// Any failure makes the stage recoverable, naming the affected tools;
/// otherwise it succeeds when something was installed and is skipped when
/// everything was already present.
pub fn summarize(outcomes: &[ToolOutcome]) -> StepOutcome {
    let failed: Vec<_> = outcomes
        .iter()
        .filter(|o| o.outcome.reason().is_some())
        .map(|o| o.tool.display_name())
        .collect();

    if !failed.is_empty() {
        StepOutcome::recoverable(format!(
            "some dependencies need attention: {}",
            failed.join(", ")
        ))
    } else if outcomes.iter().all(|o| o.outcome.is_skipped()) {
        StepOutcome::SkippedAlreadySatisfied
    } else {
        StepOutcome::Success
    }
}
