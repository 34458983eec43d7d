//! Command implementations

pub mod config;
pub mod simulate;

use anyhow::Result;
use pacing::PacingConfig;
use std::path::Path;

/// Load the config file if one was given, otherwise use defaults
pub fn load_config(path: Option<&Path>) -> Result<PacingConfig> {
    match path {
        Some(path) => PacingConfig::load(path),
        None => Ok(PacingConfig::default()),
    }
}
