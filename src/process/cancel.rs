//! Cooperative cancellation for subprocess waits.
//!
//! A token is a cloneable handle over a shared flag. The caller keeps one
//! clone and hands another to the runner; triggering the token from any
//! thread makes the runner kill the child and return a cancelled result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A boolean-settable cancellation signal.
///
/// Cancellation is one-way: once triggered, the token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation. Safe to call from any thread, and idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](CancellationToken::cancel) has been called on
    /// this token or any clone of it.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_token_is_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_from_another_thread_is_observed() {
        let token = CancellationToken::new();
        let remote = token.clone();

        let handle = std::thread::spawn(move || remote.cancel());
        handle.join().unwrap();

        assert!(token.is_cancelled());
    }
}
