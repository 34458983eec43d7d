//! Error types for pacing primitives

use thiserror::Error;

/// Errors raised while constructing or configuring pacing primitives
///
/// Failures of the wrapped functions themselves are never turned into a
/// `PacingError`; they propagate to whoever observes the call.
#[derive(Debug, Error)]
pub enum PacingError {
    /// A debouncer was created outside of a tokio runtime
    #[error("no tokio runtime available to schedule deferred calls")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
