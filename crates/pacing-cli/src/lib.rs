//! Library side of the `pace` CLI
//!
//! Exposes trace replay so it can be tested without spawning the binary.

pub mod replay;

pub use replay::{replay, Execution, Mode};
