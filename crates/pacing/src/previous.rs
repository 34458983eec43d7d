//! One-step history of a tracked value

/// Remembers the value passed to the previous [`track`](Previous::track) call
#[derive(Debug, Clone, Default)]
pub struct Previous<T> {
    slot: Option<T>,
}

impl<T> Previous<T> {
    /// Create a tracker with nothing recorded
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Record `value` and return the one recorded before it
    ///
    /// Returns `None` on the first call.
    pub fn track(&mut self, value: T) -> Option<T> {
        self.slot.replace(value)
    }

    /// The most recently tracked value
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// Forget the recorded value
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
