//! Install command implementation
//!
//! The installation process:
//! 1. Load configuration and resolve the installation directory
//! 2. Detect the host platform
//! 3. Confirm with the user (unless `--yes`)
//! 4. Run the pipeline on a worker thread, rendering its events
//!
//! Ctrl-C requests cancellation at the next stage boundary; a second Ctrl-C
//! terminates the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::Style;
use inquire::Confirm;
use signal_hook::consts::SIGINT;

use crate::cli::InstallArgs;
use crate::config::{self, InstallerConfig};
use crate::error::Result;
use crate::events::{TerminalState, TracingSink};
use crate::pipeline::{CancelToken, InstallReport, InstallationPlan, Installer, shell_runner_factory};
use crate::platform::{self, OsFamily, PlatformProfile};
use crate::progress::ProgressDisplay;
use crate::runner::{CommandRunner, ShellRunner};
use crate::source::HttpFetcher;

/// Exit status used when a second Ctrl-C kills the process
const SIGINT_EXIT_CODE: i32 = 130;

/// Run the install command
///
/// Returns `None` when the user declines the confirmation prompt.
pub fn run(config_path: Option<&Path>, args: &InstallArgs) -> Result<Option<TerminalState>> {
    let config = config::load(config_path)?;
    let plan = build_plan(args, &config)?;
    let probe_runner = ShellRunner::new(Arc::new(TracingSink));
    let profile = platform::detect(&probe_runner);

    print_summary(&plan, &profile, &config);
    if !args.yes && !confirm()? {
        println!("Installation aborted.");
        return Ok(None);
    }
    if needs_sudo(&plan, &profile, &probe_runner) {
        authenticate_sudo();
    }

    let fetcher = HttpFetcher::new(config.network.download_timeout())?;
    let installer = Installer::new(config, profile, Arc::new(fetcher), shell_runner_factory())
        .with_desktop_dir(config::desktop_dir());
    let cancel = CancelToken::new();
    register_interrupt(&cancel)?;
    let handle = installer.start(plan, cancel)?;

    let display = ProgressDisplay::new();
    for event in handle.events() {
        display.handle(&event);
    }
    let report = handle.wait()?;
    print_warnings(&report);

    Ok(Some(report.state))
}

/// `--dir` wins over `install_dir` from the config file
fn build_plan(args: &InstallArgs, config: &InstallerConfig) -> Result<InstallationPlan> {
    let target: PathBuf = match args.dir.as_ref().or(config.install_dir.as_ref()) {
        Some(dir) => dir.clone(),
        None => config::default_install_dir()?,
    };
    Ok(InstallationPlan::new(target)?
        .with_dependencies(!args.no_deps)
        .with_shortcuts(!args.no_shortcuts)
        .with_launch(!args.no_launch))
}

/// First Ctrl-C sets the cancel flag, the next one exits immediately
fn register_interrupt(cancel: &CancelToken) -> Result<()> {
    let flag = cancel.flag();
    signal_hook::flag::register_conditional_shutdown(SIGINT, SIGINT_EXIT_CODE, Arc::clone(&flag))?;
    signal_hook::flag::register(SIGINT, flag)?;
    Ok(())
}

/// Whether provisioning will run `sudo` package installs on this host
fn needs_sudo(
    plan: &InstallationPlan,
    profile: &PlatformProfile,
    runner: &dyn CommandRunner,
) -> bool {
    plan.install_dependencies
        && profile.os == OsFamily::Linux
        && profile.package_manager.is_some()
        && profile
            .required_tools
            .iter()
            .any(|tool| !runner.exists(tool.probe()))
}

/// Cache sudo credentials while the terminal still belongs to us
///
/// Commands run by the pipeline lead their own process group and cannot read
/// the terminal, so a password prompt there would stall the run.
fn authenticate_sudo() {
    println!("Administrator rights are needed to install missing dependencies.");
    match std::process::Command::new("sudo").arg("-v").status() {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(%status, "sudo authentication failed"),
        Err(e) => tracing::warn!(error = %e, "could not run sudo"),
    }
}

fn confirm() -> Result<bool> {
    Ok(Confirm::new("Proceed with installation?")
        .with_default(true)
        .with_help_message("Use --yes to skip this prompt")
        .prompt()?)
}

fn enabled(flag: bool) -> console::StyledObject<&'static str> {
    if flag {
        Style::new().green().apply_to("yes")
    } else {
        Style::new().dim().apply_to("no")
    }
}

fn print_summary(plan: &InstallationPlan, profile: &PlatformProfile, config: &InstallerConfig) {
    let label = Style::new().bold();
    println!(
        "{}",
        Style::new().bold().cyan().apply_to(format!("{} installer", config.app.name))
    );
    println!(
        "  {} {}",
        label.apply_to("Install to:"),
        plan.target_dir.display()
    );
    println!("  {} {}", label.apply_to("Platform:"), profile);
    println!(
        "  {} {}",
        label.apply_to("Install dependencies:"),
        enabled(plan.install_dependencies)
    );
    println!(
        "  {} {}",
        label.apply_to("Create shortcuts:"),
        enabled(plan.create_shortcuts)
    );
    println!(
        "  {} {}",
        label.apply_to("Launch when done:"),
        enabled(plan.launch_after_install)
    );
    println!();
}

fn print_warnings(report: &InstallReport) {
    let warnings = report.warnings();
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("{}", Style::new().yellow().bold().apply_to("Needs attention:"));
    for warning in warnings {
        println!("  - {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: Option<&Path>) -> InstallArgs {
        InstallArgs {
            dir: dir.map(Path::to_path_buf),
            no_deps: true,
            no_shortcuts: false,
            no_launch: true,
            yes: true,
        }
    }

    #[test]
    fn test_build_plan_maps_flags() {
        let temp = crate::test_fixtures::create_temp_dir();
        let plan = build_plan(&args(Some(temp.path())), &InstallerConfig::default()).unwrap();

        assert!(!plan.install_dependencies);
        assert!(plan.create_shortcuts);
        assert!(!plan.launch_after_install);
        assert!(plan.target_dir.is_absolute());
    }

    #[test]
    fn test_build_plan_rejects_empty_dir() {
        assert!(build_plan(&args(Some(Path::new(""))), &InstallerConfig::default()).is_err());
    }

    #[test]
    fn test_build_plan_prefers_flag_over_config() {
        let temp = crate::test_fixtures::create_temp_dir();
        let config = InstallerConfig {
            install_dir: Some(temp.path().join("from-config")),
            ..InstallerConfig::default()
        };

        let from_config = build_plan(&args(None), &config).unwrap();
        assert!(from_config.target_dir.ends_with("from-config"));

        let from_flag = build_plan(&args(Some(&temp.path().join("from-flag"))), &config).unwrap();
        assert!(from_flag.target_dir.ends_with("from-flag"));
    }

    #[test]
    fn test_needs_sudo_only_for_missing_tools_on_linux() {
        use crate::platform::{APPLICATION_TOOLS, PackageManager};
        use crate::test_fixtures::ScriptedRunner;

        let temp = crate::test_fixtures::create_temp_dir();
        let plan = InstallationPlan::new(temp.path()).unwrap();
        let linux = PlatformProfile::new(OsFamily::Linux, Some(PackageManager::Apt))
            .with_tools(APPLICATION_TOOLS);
        let missing_psql = ScriptedRunner::new().with_tools(["node", "git"]);
        let all_present = ScriptedRunner::new().with_tools(["node", "git", "psql"]);

        assert!(needs_sudo(&plan, &linux, &missing_psql));
        assert!(!needs_sudo(&plan, &linux, &all_present));
        assert!(!needs_sudo(
            &plan.clone().with_dependencies(false),
            &linux,
            &missing_psql
        ));
        let mac = PlatformProfile::new(OsFamily::MacOs, Some(PackageManager::Homebrew))
            .with_tools(APPLICATION_TOOLS);
        assert!(!needs_sudo(&plan, &mac, &missing_psql));
        let bare_linux = PlatformProfile::new(OsFamily::Linux, None).with_tools(APPLICATION_TOOLS);
        assert!(!needs_sudo(&plan, &bare_linux, &missing_psql));
    }
}
