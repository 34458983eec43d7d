//! Timing configuration
//!
//! Loaded from a TOML file such as:
//! ```toml
//! [debounce]
//! delay_ms = 300
//!
//! [throttle]
//! window_ms = 1000
//! ```
//! Missing sections and fields fall back to their defaults.

use crate::PacingError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Upper bound accepted for any configured duration (one hour)
const MAX_DURATION_MS: i64 = 60 * 60 * 1000;

/// Pacing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default)]
    pub debounce: DebounceConfig,

    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// Debounce settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period in milliseconds (default: 300)
    ///
    /// Signed so that hand-edited negative values parse; they are treated as
    /// zero.
    #[serde(default = "default_debounce_ms")]
    pub delay_ms: i64,
}

/// Throttle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Window in milliseconds (default: 1000)
    #[serde(default = "default_throttle_ms")]
    pub window_ms: i64,
}

impl PacingConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject durations above one hour
    pub fn validate(&self) -> std::result::Result<(), PacingError> {
        check_range("debounce.delay_ms", self.debounce.delay_ms)?;
        check_range("throttle.window_ms", self.throttle.window_ms)?;
        Ok(())
    }
}

impl DebounceConfig {
    /// Configured delay, negative values clamped to zero
    pub fn delay(&self) -> Duration {
        clamp_millis("debounce.delay_ms", self.delay_ms)
    }
}

impl ThrottleConfig {
    /// Configured window, negative values clamped to zero
    pub fn window(&self) -> Duration {
        clamp_millis("throttle.window_ms", self.window_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_debounce_ms(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_ms: default_throttle_ms(),
        }
    }
}

fn default_debounce_ms() -> i64 {
    300
}

fn default_throttle_ms() -> i64 {
    1000
}

fn check_range(field: &str, value: i64) -> std::result::Result<(), PacingError> {
    if value > MAX_DURATION_MS {
        return Err(PacingError::InvalidConfig(format!(
            "{} = {} exceeds the maximum of {} ms",
            field, value, MAX_DURATION_MS
        )));
    }
    Ok(())
}

fn clamp_millis(field: &str, value: i64) -> Duration {
    if value < 0 {
        warn!("{} = {} is negative, using 0", field, value);
    }
    Duration::from_millis(value.max(0) as u64)
}
