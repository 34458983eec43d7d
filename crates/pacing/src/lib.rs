//! Call pacing primitives
//!
//! This crate provides wrappers that control *when* and *how often* a
//! caller-supplied function or computation actually runs:
//! - [`Debouncer`] - collapse a burst of calls into one delayed call
//! - [`Throttler`] - at most one execution per window, excess calls dropped
//! - [`StableCallback`] - a fixed handle dispatching to the latest target
//! - [`Memo`] - cached computation keyed by a dependency value
//! - [`Previous`] - the value from the previous call
//!
//! Every instance is owned by exactly one caller. Dropping an instance
//! releases its state; a dropped [`Debouncer`] never fires again.

pub mod config;
pub mod debounce;
pub mod error;
pub mod memo;
pub mod previous;
pub mod stable;
pub mod throttle;

// Re-exports
pub use config::{DebounceConfig, PacingConfig, ThrottleConfig};
pub use debounce::{debounce, Debouncer};
pub use error::PacingError;
pub use memo::{ByIdentity, Memo};
pub use previous::Previous;
pub use stable::{StableCallback, StableHandle};
pub use throttle::{throttle, Throttler};

/// Result type for pacing operations
pub type Result<T> = std::result::Result<T, PacingError>;
