//! Pipeline stages and run state

use std::fmt;

use crate::outcome::StepOutcome;

/// One ordered unit of the installation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CreateTargetDir,
    ProvisionDependencies,
    AcquireSource,
    ConfigureEnvironment,
    Build,
    CreateShortcuts,
    Launch,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 7] = [
        Stage::CreateTargetDir,
        Stage::ProvisionDependencies,
        Stage::AcquireSource,
        Stage::ConfigureEnvironment,
        Stage::Build,
        Stage::CreateShortcuts,
        Stage::Launch,
    ];

    /// Progress percentages emitted on entry and on exit
    pub fn checkpoints(self) -> (u8, u8) {
        match self {
            Stage::CreateTargetDir => (0, 5),
            Stage::ProvisionDependencies => (10, 30),
            Stage::AcquireSource => (40, 50),
            Stage::ConfigureEnvironment => (60, 80),
            Stage::Build => (90, 95),
            Stage::CreateShortcuts => (96, 97),
            Stage::Launch => (98, 99),
        }
    }

    pub fn entry_message(self) -> &'static str {
        match self {
            Stage::CreateTargetDir => "Starting installation...",
            Stage::ProvisionDependencies => "Installing dependencies...",
            Stage::AcquireSource => "Downloading application...",
            Stage::ConfigureEnvironment => "Setting up database...",
            Stage::Build => "Building application...",
            Stage::CreateShortcuts => "Creating shortcuts...",
            Stage::Launch => "Starting application...",
        }
    }

    pub fn exit_message(self) -> &'static str {
        match self {
            Stage::CreateTargetDir => "Created installation directory",
            Stage::ProvisionDependencies => "Dependencies installed",
            Stage::AcquireSource => "Application downloaded",
            Stage::ConfigureEnvironment => "Database configured",
            Stage::Build => "Application built",
            Stage::CreateShortcuts => "Shortcuts created",
            Stage::Launch => "Application started",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CreateTargetDir => "create-target-directory",
            Stage::ProvisionDependencies => "provision-dependencies",
            Stage::AcquireSource => "acquire-source",
            Stage::ConfigureEnvironment => "configure-environment",
            Stage::Build => "build",
            Stage::CreateShortcuts => "create-shortcuts",
            Stage::Launch => "launch",
        };
        f.write_str(name)
    }
}

/// Where a run is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    Running(Stage),
    Completed,
    Cancelled,
    Failed(String),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Completed | PipelineState::Cancelled | PipelineState::Failed(_)
        )
    }

    /// Next state after `stage` produced `outcome`
    pub fn after(stage: Stage, outcome: &StepOutcome) -> Self {
        match outcome {
            StepOutcome::FatalFailure(reason) => PipelineState::Failed(reason.clone()),
            _ => PipelineState::Running(stage),
        }
    }
}
