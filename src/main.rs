//! ARS installer
//!
//! Installs the Audience Response System web application: detects the host,
//! provisions Node.js, Git and PostgreSQL, fetches and configures the
//! application, builds it and optionally creates shortcuts and launches it.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod configure;
mod error;
mod events;
mod logging;
mod outcome;
mod pipeline;
mod platform;
mod progress;
mod provision;
mod runner;
mod source;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use events::TerminalState;

/// Exit status for a run that ended with `Cancelled`
const CANCELLED_EXIT_CODE: i32 = 130;

fn exit_code(state: &TerminalState) -> i32 {
    match state {
        TerminalState::Completed => 0,
        TerminalState::Cancelled => CANCELLED_EXIT_CODE,
        TerminalState::Failed(_) => 1,
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Install(args) => commands::install::run(config_path, args)
            .map(|state| state.as_ref().map_or(0, exit_code)),
        Commands::Detect(args) => commands::detect::run(args).map(|()| 0),
        Commands::Config => commands::config::run(config_path).map(|()| 0),
        Commands::Version => commands::version::run().map(|()| 0),
        Commands::Completions(args) => commands::completions::run(args).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
