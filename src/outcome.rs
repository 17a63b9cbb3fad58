//! Per-step outcome shared by every pipeline stage

use std::fmt;

use crate::error::InstallerError;

/// Result of one pipeline step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Precondition already met; nothing was done
    SkippedAlreadySatisfied,
    /// Logged; the pipeline continues
    RecoverableFailure(String),
    /// Halts the pipeline
    FatalFailure(String),
}

impl StepOutcome {
    pub fn recoverable(reason: impl Into<String>) -> Self {
        StepOutcome::RecoverableFailure(reason.into())
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        StepOutcome::FatalFailure(reason.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StepOutcome::FatalFailure(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::SkippedAlreadySatisfied)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StepOutcome::RecoverableFailure(reason) | StepOutcome::FatalFailure(reason) => {
                Some(reason)
            }
            StepOutcome::Success | StepOutcome::SkippedAlreadySatisfied => None,
        }
    }
}

impl From<InstallerError> for StepOutcome {
    fn from(err: InstallerError) -> Self {
        StepOutcome::FatalFailure(err.to_string())
    }
}

/// Collapse a fallible step into an outcome; errors become fatal
pub fn fatal_on_error(result: crate::error::Result<StepOutcome>) -> StepOutcome {
    result.unwrap_or_else(StepOutcome::from)
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Success => write!(f, "done"),
            StepOutcome::SkippedAlreadySatisfied => write!(f, "already satisfied"),
            StepOutcome::RecoverableFailure(reason) => write!(f, "warning: {reason}"),
            StepOutcome::FatalFailure(reason) => write!(f, "failed: {reason}"),
        }
    }
}
