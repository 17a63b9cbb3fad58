//! Detect command implementation

use std::sync::Arc;

use console::Style;

use crate::cli::DetectArgs;
use crate::error::Result;
use crate::events::TracingSink;
use crate::outcome::StepOutcome;
use crate::platform::{self, PlatformProfile};
use crate::runner::{CommandRunner, ShellRunner};

pub fn run(args: &DetectArgs) -> Result<()> {
    let runner = ShellRunner::new(Arc::new(TracingSink));
    let profile = platform::detect(&runner);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile, &runner);
    }
    Ok(())
}

fn print_profile(profile: &PlatformProfile, runner: &dyn CommandRunner) {
    let label = Style::new().bold();
    println!("{} {}", label.apply_to("Platform:"), profile.os);
    println!(
        "{} {}",
        label.apply_to("Package manager:"),
        profile
            .package_manager
            .map_or_else(|| "none".to_string(), |pm| pm.to_string())
    );
    println!("{}", label.apply_to("Required tools:"));
    for tool in &profile.required_tools {
        let status = if runner.exists(tool.probe()) {
            Style::new().green().apply_to("installed")
        } else {
            Style::new().yellow().apply_to("missing")
        };
        println!("  {:<12} {}", tool.display_name(), status);
    }
    if let Some(StepOutcome::RecoverableFailure(note)) = profile.detection_outcome() {
        println!("{} {}", Style::new().yellow().apply_to("Note:"), note);
    }
}
