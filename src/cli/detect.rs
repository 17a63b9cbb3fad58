use clap::Parser;

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}
