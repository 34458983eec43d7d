//! Stable call handles
//!
//! A [`StableCallback`] is a per-owner slot with two operations: replace the
//! target, and invoke whatever target is current. The [`StableHandle`] it
//! hands out keeps one identity for the owner's whole lifetime, so it can be
//! used as a dependency key without churning on every target update.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

type Target<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// Owner side of a stable reference
pub struct StableCallback<A, R = ()> {
    handle: StableHandle<A, R>,
}

/// Call handle with a fixed identity
///
/// Clones share the same slot and compare equal; handles from different
/// [`StableCallback`]s never do.
pub struct StableHandle<A, R = ()> {
    slot: Arc<RwLock<Target<A, R>>>,
}

impl<A, R> StableCallback<A, R> {
    /// Create the slot with an initial target
    pub fn new<F>(target: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            handle: StableHandle {
                slot: Arc::new(RwLock::new(Arc::new(target))),
            },
        }
    }

    /// Store `target` as the current target and return the stable handle
    pub fn wrap<F>(&self, target: F) -> StableHandle<A, R>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.update(target);
        self.handle()
    }

    /// Store `target` as the current target
    pub fn update<F>(&self, target: F)
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        *self.handle.slot.write() = Arc::new(target);
    }

    /// The stable handle
    pub fn handle(&self) -> StableHandle<A, R> {
        self.handle.clone()
    }
}

impl<A, R> StableHandle<A, R> {
    /// Invoke the current target
    ///
    /// The target is cloned out of the slot before it runs, so it may update
    /// the slot it was called through.
    pub fn call(&self, args: A) -> R {
        let target = self.slot.read().clone();
        target(args)
    }

    /// Whether two handles belong to the same owner
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<A, R> Clone for StableHandle<A, R> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<A, R> PartialEq for StableHandle<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A, R> Eq for StableHandle<A, R> {}

impl<A, R> fmt::Debug for StableHandle<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StableHandle")
            .field(&Arc::as_ptr(&self.slot))
            .finish()
    }
}

impl<A, R> fmt::Debug for StableCallback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableCallback")
            .field("handle", &self.handle)
            .finish()
    }
}
