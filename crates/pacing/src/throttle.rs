//! Leading-edge throttling
//!
//! The first call in a window executes immediately; every other call until
//! the window has elapsed is dropped. Nothing is queued or retried.

use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

type Callback<A, R> = Box<dyn Fn(A) -> R + Send + Sync>;

/// Throttled wrapper around a callback
pub struct Throttler<A, R = ()> {
    callback: Callback<A, R>,
    /// Minimum spacing between two executions
    window: Duration,
    /// Instant of the last executed call, `None` before the first one
    last_executed: Mutex<Option<Instant>>,
}

impl<A, R> Throttler<A, R> {
    /// Create a throttler that runs `callback` at most once per `window`
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            window,
            last_executed: Mutex::new(None),
        }
    }

    /// Run the callback if the window allows it
    ///
    /// Returns `Some` with the callback's result when it ran, `None` when the
    /// call was dropped. The window is claimed before the callback runs and no
    /// lock is held while it runs, so a re-entrant call from inside the
    /// callback is dropped too.
    pub fn call(&self, args: A) -> Option<R> {
        if !self.claim(Instant::now()) {
            trace!("Throttled call dropped");
            return None;
        }
        Some((self.callback)(args))
    }

    /// Whether a call made now would execute
    pub fn would_execute(&self) -> bool {
        self.is_open(*self.last_executed.lock(), Instant::now())
    }

    /// Forget the last execution so the next call runs immediately
    pub fn reset(&self) {
        *self.last_executed.lock() = None;
    }

    /// Instant of the last executed call
    pub fn last_executed(&self) -> Option<Instant> {
        *self.last_executed.lock()
    }

    /// Minimum spacing between two executions
    pub fn window(&self) -> Duration {
        self.window
    }

    fn claim(&self, now: Instant) -> bool {
        let mut last = self.last_executed.lock();
        if !self.is_open(*last, now) {
            return false;
        }
        *last = Some(now);
        true
    }

    fn is_open(&self, last: Option<Instant>, now: Instant) -> bool {
        match last {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None => true,
        }
    }
}

impl<A, R> fmt::Debug for Throttler<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttler")
            .field("window", &self.window)
            .field("last_executed", &self.last_executed())
            .finish()
    }
}

/// Throttle `callback` to at most once per `window`
pub fn throttle<A, R, F>(window: Duration, callback: F) -> Throttler<A, R>
where
    F: Fn(A) -> R + Send + Sync + 'static,
{
    Throttler::new(window, callback)
}
