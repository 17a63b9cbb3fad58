//! Progress bar display for installations

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::events::{InstallEvent, TerminalState};

/// Renders pipeline events on the terminal
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// Create a progress bar spanning 0-100 percent
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(100))
    }

    /// Display that draws nothing
    #[cfg(test)]
    pub fn hidden() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(100);
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    /// Apply one event; returns the terminal state once the run has finished
    pub fn handle(&self, event: &InstallEvent) -> Option<TerminalState> {
        match event {
            InstallEvent::Progress(progress) => {
                self.bar.set_position(u64::from(progress.percentage));
                self.bar.set_message(progress.message.clone());
                None
            }
            InstallEvent::Log(line) => {
                self.bar.println(style_log_line(line));
                None
            }
            InstallEvent::Finished(state) => {
                self.finish(state);
                Some(state.clone())
            }
        }
    }

    fn finish(&self, state: &TerminalState) {
        match state {
            TerminalState::Completed => self
                .bar
                .finish_with_message(Style::new().green().bold().apply_to(state).to_string()),
            TerminalState::Cancelled => self
                .bar
                .abandon_with_message(Style::new().yellow().apply_to(state).to_string()),
            TerminalState::Failed(_) => self
                .bar
                .abandon_with_message(Style::new().red().bold().apply_to(state).to_string()),
        }
    }

    #[cfg(test)]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Colour a log line by its severity prefix
fn style_log_line(line: &str) -> String {
    let style = if line.starts_with("ERROR:") {
        Style::new().red().bold()
    } else if line.starts_with("Warning:") || line.starts_with("Error:") {
        Style::new().yellow()
    } else if line.starts_with("Running:") || line.starts_with("Starting:") {
        Style::new().cyan()
    } else {
        Style::new().dim()
    };
    style.apply_to(line).to_string()
}
