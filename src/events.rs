//! Progress and log events emitted by the installation pipeline
//!
//! The pipeline worker never talks to a presenter directly. Every progress
//! checkpoint, command transcript line and the final outcome travel through an
//! [`EventSink`], which in production is the sending half of an mpsc channel.

use std::fmt;
use std::sync::mpsc::Sender;

/// A progress checkpoint: percentage in `0..=100` plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub percentage: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(percentage: u8, message: impl Into<String>) -> Self {
        Self {
            percentage: percentage.min(100),
            message: message.into(),
        }
    }
}

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalState {
    Completed,
    Cancelled,
    /// First fatal error message, verbatim
    Failed(String),
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalState::Completed => write!(f, "Installation completed successfully!"),
            TerminalState::Cancelled => write!(f, "Installation cancelled"),
            TerminalState::Failed(reason) => write!(f, "Installation failed: {reason}"),
        }
    }
}

/// Message carried from the worker to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    Progress(ProgressEvent),
    Log(String),
    Finished(TerminalState),
}

/// Destination for pipeline events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: InstallEvent);

    fn progress(&self, percentage: u8, message: &str) {
        self.emit(InstallEvent::Progress(ProgressEvent::new(percentage, message)));
    }

    fn log(&self, line: &str) {
        self.emit(InstallEvent::Log(line.to_string()));
    }
}

/// Sink backed by an mpsc channel
///
/// A dropped receiver is not an error: the installation keeps running even
/// when nobody is watching.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<InstallEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<InstallEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: InstallEvent) {
        let _ = self.sender.send(event);
    }
}

/// Sink that forwards events to `tracing`, for commands with no presenter
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: InstallEvent) {
        match event {
            InstallEvent::Progress(p) => tracing::info!(percentage = p.percentage, "{}", p.message),
            InstallEvent::Log(line) => tracing::debug!("{line}"),
            InstallEvent::Finished(state) => tracing::info!("{state}"),
        }
    }
}
