//! Configuration display command

use anyhow::Result;
use owo_colors::OwoColorize;
use pacing::PacingConfig;
use std::path::Path;

/// Print the effective configuration as TOML
pub fn run(config: &PacingConfig, path: Option<&Path>) -> Result<()> {
    println!("{}", "Pacing Configuration".bold());
    match path {
        Some(path) => println!("{}: {}\n", "Location".dimmed(), path.display().dimmed()),
        None => println!("{}\n", "(built-in defaults)".dimmed()),
    }

    print!("{}", config.to_toml_string()?);
    Ok(())
}
