//! Replay a timed call trace through a debouncer or throttler
//!
//! Calls are issued at fixed offsets from the start of the replay; every
//! execution of the wrapped function is recorded with the index and offset of
//! the call that produced it.

use anyhow::Result;
use pacing::{Debouncer, Throttler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Which primitive the trace is replayed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Trailing-edge debounce
    Debounce,
    /// Leading-edge throttle
    Throttle,
}

/// One execution of the wrapped function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Position of the originating call in the trace
    pub call_index: usize,
    /// Offset at which the originating call was made
    pub requested_at: Duration,
    /// Offset at which the wrapped function ran
    pub executed_at: Duration,
}

/// Replay calls at `offsets_ms` through `mode` with the given delay/window
///
/// Offsets must be non-decreasing. For debounce, the replay waits until the
/// last pending call has had time to fire.
pub async fn replay(mode: Mode, delay: Duration, offsets_ms: &[u64]) -> Result<Vec<Execution>> {
    if let Some(pair) = offsets_ms.windows(2).find(|pair| pair[1] < pair[0]) {
        anyhow::bail!(
            "Call offsets must be non-decreasing ({} ms follows {} ms)",
            pair[1],
            pair[0]
        );
    }

    let start = Instant::now();
    let executions = Arc::new(Mutex::new(Vec::new()));
    let sink = executions.clone();
    let record = move |(call_index, requested_at): (usize, Duration)| {
        sink.lock().push(Execution {
            call_index,
            requested_at,
            executed_at: start.elapsed(),
        });
    };

    match mode {
        Mode::Debounce => {
            let debouncer = Debouncer::new(delay, record)?;
            for (index, offset) in offsets_ms.iter().enumerate() {
                let at = Duration::from_millis(*offset);
                sleep_until(start + at).await;
                debouncer.call((index, at));
            }

            let last = offsets_ms.last().copied().unwrap_or(0);
            let settle = Duration::from_millis(last) + delay + Duration::from_millis(1);
            sleep_until(start + settle).await;
        }
        Mode::Throttle => {
            let throttler = Throttler::new(delay, record);
            for (index, offset) in offsets_ms.iter().enumerate() {
                let at = Duration::from_millis(*offset);
                sleep_until(start + at).await;
                if throttler.call((index, at)).is_none() {
                    debug!(index, "Call dropped by throttle");
                }
            }
        }
    }

    let result = executions.lock().clone();
    Ok(result)
}
