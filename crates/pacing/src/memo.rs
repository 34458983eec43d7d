//! Memoized computations keyed by dependencies
//!
//! A [`Memo`] holds one computed value together with the dependency key it
//! was computed from. The key is compared with its `PartialEq`; tuples,
//! arrays and `Vec`s compare element by element, each element by its own
//! equality. Wrap an element in [`ByIdentity`] to compare it by reference
//! instead of by value.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::trace;

/// Single-slot cache for an expensive computation
#[derive(Debug)]
pub struct Memo<K, T> {
    slot: Option<ComputationSlot<K, T>>,
    /// Number of successful compute runs
    computations: u64,
}

#[derive(Debug)]
struct ComputationSlot<K, T> {
    deps: K,
    value: T,
}

impl<K: PartialEq, T> Memo<K, T> {
    /// Create an empty memo
    pub fn new() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }

    /// Return the cached value for `deps`, running `compute` if they changed
    pub fn get<F>(&mut self, deps: K, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.try_get(deps, || Ok::<T, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get`](Self::get), for computations that can fail
    ///
    /// On failure the stored key and value stay at their last successful
    /// state and the error is returned.
    pub fn try_get<E, F>(&mut self, deps: K, compute: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let slot = match self.slot.take() {
            Some(slot) if slot.deps == deps => slot,
            previous => {
                // keep the last good state in place while computing
                self.slot = previous;
                let value = compute()?;
                self.computations += 1;
                trace!(computations = self.computations, "Memo recomputed");
                ComputationSlot { deps, value }
            }
        };

        Ok(&self.slot.insert(slot).value)
    }

    /// The cached value, if any, without checking dependencies
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref().map(|slot| &slot.value)
    }

    /// Drop the cached value so the next lookup recomputes
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Number of successful compute runs so far
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

impl<K: PartialEq, T> Default for Memo<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dependency element compared by reference rather than by value
pub struct ByIdentity<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> ByIdentity<T> {
    /// Wrap `value` so it compares by pointer
    pub fn new(value: Arc<T>) -> Self {
        Self(value)
    }
}

impl<T: ?Sized> Clone for ByIdentity<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> PartialEq for ByIdentity<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for ByIdentity<T> {}

impl<T: ?Sized> Deref for ByIdentity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> fmt::Debug for ByIdentity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByIdentity({:p})", Arc::as_ptr(&self.0))
    }
}
