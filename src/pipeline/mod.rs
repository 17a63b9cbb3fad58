//! Installation pipeline
//!
//! This module handles:
//! - The installation request (`plan.rs`)
//! - Stage order, progress checkpoints and run state (`stage.rs`)
//! - Running the stages and collecting the report (`orchestrator.rs`)
//! - Background runs with an event channel and cancellation (`installer.rs`, `cancel.rs`)
//!
//! ```text
//! create-target-directory → [provision-dependencies] → acquire-source
//!   → configure-environment → build → [create-shortcuts] → [launch]
//! ```

pub mod cancel;
pub mod installer;
pub mod orchestrator;
pub mod plan;
pub mod stage;

pub use cancel::CancelToken;
pub use installer::{Installer, shell_runner_factory};
pub use orchestrator::InstallReport;
pub use plan::InstallationPlan;
