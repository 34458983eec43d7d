//! Trailing-edge debouncing
//!
//! A burst of calls collapses into a single deferred invocation that runs
//! with the arguments of the last call in the burst, `delay` after that call.
//! A call never runs inside the `call` that requested it. An earlier call
//! whose deadline has passed but whose timer task has not run yet is still
//! executed, so calls at least `delay` apart each fire.

use crate::Result;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error};

type Callback<A> = Box<dyn Fn(A) -> anyhow::Result<()> + Send + Sync>;

/// Debounced wrapper around a callback
///
/// Owns at most one pending invocation. Dropping the debouncer cancels it,
/// so the callback is never invoked after its owner is gone.
pub struct Debouncer<A: Send + 'static> {
    /// State shared with the timer task
    shared: Arc<Shared<A>>,
    /// Quiet period before the pending call fires
    delay: Duration,
    /// Runtime the timer tasks are spawned on
    runtime: Handle,
}

struct Shared<A> {
    callback: Callback<A>,
    state: Mutex<State<A>>,
}

struct State<A> {
    /// Monotonic counter, bumped for every scheduled invocation
    generation: u64,
    pending: Option<PendingInvocation<A>>,
}

/// The single scheduled call of a debouncer
struct PendingInvocation<A> {
    generation: u64,
    args: A,
    /// Instant the timer is due to fire
    deadline: Instant,
    timer: JoinHandle<()>,
}

impl<A: Send + 'static> Debouncer<A> {
    /// Create a debouncer on the current tokio runtime
    ///
    /// Fails with [`PacingError::NoRuntime`](crate::PacingError::NoRuntime)
    /// when called outside a runtime.
    pub fn new<F>(delay: Duration, callback: F) -> Result<Self>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::new_fallible(delay, move |args| {
            callback(args);
            Ok(())
        })
    }

    /// Create a debouncer whose callback can fail
    ///
    /// The deferred call runs outside any caller's frame, so errors are
    /// reported through `tracing` rather than returned.
    pub fn new_fallible<F>(delay: Duration, callback: F) -> Result<Self>
    where
        F: Fn(A) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let runtime = Handle::try_current()?;
        Ok(Self::with_handle(runtime, delay, callback))
    }

    /// Create a debouncer that schedules on an explicit runtime
    pub fn with_handle<F>(runtime: Handle, delay: Duration, callback: F) -> Self
    where
        F: Fn(A) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                callback: Box::new(callback),
                state: Mutex::new(State {
                    generation: 0,
                    pending: None,
                }),
            }),
            delay,
            runtime,
        }
    }

    /// Request an invocation with `args`
    ///
    /// A pending invocation that has not reached its deadline is cancelled
    /// and its arguments dropped. One whose deadline has already passed is
    /// due rather than superseded: it runs first, then the new call is
    /// scheduled. Returns without running the new call.
    pub fn call(&self, args: A) {
        let due = {
            let mut state = self.shared.state.lock();
            let now = Instant::now();
            if state.pending.as_ref().is_some_and(|p| now >= p.deadline) {
                state.pending.take()
            } else {
                None
            }
        };

        if let Some(pending) = due {
            pending.timer.abort();
            debug!(
                generation = pending.generation,
                "Running due debounced call before rescheduling"
            );
            self.shared.invoke(pending.generation, pending.args);
        }

        self.schedule(args);
    }

    fn schedule(&self, args: A) {
        let mut state = self.shared.state.lock();

        if let Some(previous) = state.pending.take() {
            previous.timer.abort();
            debug!(generation = previous.generation, "Superseded pending debounced call");
        }

        state.generation += 1;
        let generation = state.generation;
        let shared = Arc::downgrade(&self.shared);
        let delay = self.delay;
        let deadline = Instant::now() + delay;

        let timer = self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(shared) = shared.upgrade() {
                shared.fire(generation);
            }
        });

        debug!(generation, delay_ms = delay.as_millis() as u64, "Scheduled debounced call");
        state.pending = Some(PendingInvocation {
            generation,
            args,
            deadline,
            timer,
        });
    }

    /// Cancel the pending invocation, if any
    ///
    /// Returns true if something was cancelled.
    pub fn cancel(&self) -> bool {
        match self.take_pending() {
            Some(pending) => {
                pending.timer.abort();
                debug!(generation = pending.generation, "Cancelled pending debounced call");
                true
            }
            None => false,
        }
    }

    /// Run the pending invocation immediately in the caller's frame
    ///
    /// Errors from the callback propagate to the caller. Returns whether an
    /// invocation was pending.
    pub fn flush(&self) -> anyhow::Result<bool> {
        let Some(pending) = self.take_pending() else {
            return Ok(false);
        };

        pending.timer.abort();
        debug!(generation = pending.generation, "Flushing pending debounced call");
        (self.shared.callback)(pending.args)?;
        Ok(true)
    }

    /// Whether an invocation is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }

    /// Quiet period before a pending call fires
    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn take_pending(&self) -> Option<PendingInvocation<A>> {
        self.shared.state.lock().pending.take()
    }
}

impl<A> Shared<A> {
    /// Timer expiry for `generation`
    ///
    /// A timer that woke up after being superseded finds a newer generation
    /// (or nothing) in the slot and does nothing.
    fn fire(&self, generation: u64) {
        let args = {
            let mut state = self.state.lock();
            match state.pending.take() {
                Some(pending) if pending.generation == generation => pending.args,
                other => {
                    state.pending = other;
                    return;
                }
            }
        };

        debug!(generation, "Debounced call firing");
        self.invoke(generation, args);
    }

    /// Run the callback outside any caller's frame, reporting failures
    fn invoke(&self, generation: u64, args: A) {
        if let Err(e) = (self.callback)(args) {
            error!(generation, "Debounced call failed: {:#}", e);
        }
    }
}

impl<A: Send + 'static> Drop for Debouncer<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<A: Send + 'static> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Debounce `callback` by `delay` on the current runtime
pub fn debounce<A, F>(delay: Duration, callback: F) -> Result<Debouncer<A>>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debouncer::new(delay, callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PacingError;
    use tokio::time::{sleep, sleep_until};

    type Log<T> = Arc<Mutex<Vec<(T, Instant)>>>;

    fn recorder<T: Send + 'static>() -> (Log<T>, impl Fn(T) + Send + Sync + 'static) {
        let log: Log<T> = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, move |value: T| sink.lock().push((value, Instant::now())))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_uses_last_arguments() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(300), callback).unwrap();
        let start = Instant::now();

        debouncer.call(1);
        sleep(ms(100)).await;
        debouncer.call(2);
        sleep(ms(100)).await;
        debouncer.call(3);

        sleep(ms(400)).await;

        let log = log.lock();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, 3);
        assert!(log[0].1 - start >= ms(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_calls_fire_independently() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(300), callback).unwrap();

        debouncer.call("a");
        sleep(ms(350)).await;
        debouncer.call("b");
        sleep(ms(350)).await;

        let values: Vec<_> = log.lock().iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_exactly_one_delay_apart_both_fire() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(300), callback).unwrap();
        let start = Instant::now();

        debouncer.call("a");
        sleep_until(start + ms(300)).await;
        debouncer.call("b");
        sleep(ms(400)).await;

        let log = log.lock();
        let values: Vec<_> = log.iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec!["a", "b"]);
        assert!(log[1].1 - start >= ms(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_just_before_deadline_supersedes() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(300), callback).unwrap();
        let start = Instant::now();

        debouncer.call("a");
        sleep_until(start + ms(299)).await;
        debouncer.call("b");
        sleep(ms(400)).await;

        let values: Vec<_> = log.lock().iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec!["b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_is_never_synchronous() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(Duration::ZERO, callback).unwrap();

        debouncer.call(7);
        assert!(log.lock().is_empty());
        assert!(debouncer.is_pending());

        sleep(ms(1)).await;
        assert_eq!(log.lock().len(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_call() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(100), callback).unwrap();

        debouncer.call(1);
        drop(debouncer);
        sleep(ms(500)).await;

        assert!(log.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(100), callback).unwrap();

        assert!(!debouncer.cancel());
        debouncer.call(1);
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());

        sleep(ms(500)).await;
        assert!(log.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_runs_now_and_disarms_timer() {
        let (log, callback) = recorder();
        let debouncer = Debouncer::new(ms(100), callback).unwrap();

        assert!(!debouncer.flush().unwrap());
        debouncer.call(9);
        assert!(debouncer.flush().unwrap());
        assert_eq!(log.lock().len(), 1);

        sleep(ms(500)).await;
        assert_eq!(log.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_propagates_callback_error() {
        let debouncer =
            Debouncer::new_fallible(ms(100), |_: u8| anyhow::bail!("lookup failed")).unwrap();

        debouncer.call(1);
        let err = debouncer.flush().unwrap_err();
        assert!(err.to_string().contains("lookup failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_error_does_not_stop_later_calls() {
        let (log, record) = recorder();
        let debouncer = Debouncer::new_fallible(ms(50), move |n: u32| {
            record(n);
            if n == 1 {
                anyhow::bail!("first call fails");
            }
            Ok(())
        })
        .unwrap();

        debouncer.call(1);
        sleep(ms(100)).await;
        debouncer.call(2);
        sleep(ms(100)).await;

        let values: Vec<_> = log.lock().iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_requires_runtime() {
        let result = Debouncer::new(ms(10), |_: ()| {});
        assert!(matches!(result, Err(PacingError::NoRuntime(_))));
    }
}
