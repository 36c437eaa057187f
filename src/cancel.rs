//! Cooperative cancellation.
//!
//! The Ctrl+C handler runs on its own thread and flips the token; the
//! automation loops poll it once per iteration and stop at the next check.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared stop flag for cooperative cancellation.
///
/// Clones share the same underlying flag, so the handle given to the signal
/// handler and the one polled by a running loop observe the same state.
///
/// # Example
///
/// ```
/// use arrastools::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handler_token = token.clone();
///
/// handler_token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once `cancel()` has been called on this token or any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
