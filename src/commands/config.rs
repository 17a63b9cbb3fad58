//! Config command implementation
//!
//! Prints the effective configuration (file values merged over defaults) as
//! YAML, which doubles as a starting point for a custom config file.

use std::path::Path;

use console::Style;

use crate::config;
use crate::error::Result;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let effective = config::load(config_path)?;
    let source = match config_path {
        Some(path) => path.display().to_string(),
        None => config::default_config_path()
            .filter(|path| path.is_file())
            .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string()),
    };

    eprintln!(
        "{} {}",
        Style::new().bold().apply_to("# Source:"),
        Style::new().dim().apply_to(source)
    );
    print!("{}", effective.to_yaml()?);
    Ok(())
}
