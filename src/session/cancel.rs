//! Cancellation handles for in-flight recovery requests.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signals the owner of an in-flight recovery request to stop waiting.
///
/// Clones share a single flag, so the store can hold one end while the
/// request loop polls the other. Cancellation is sticky: once tripped the
/// token stays cancelled. Tripping the token does not abort the
/// server-side archive search, it only releases the client from waiting
/// on the response.
///
/// Tokens are never serialized; a session rehydrated after a restart
/// carries no token (see [`PersistedSession`](super::PersistedSession)).
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token.
    ///
    /// Returns `true` if this call is the one that tripped it, `false`
    /// if it was already cancelled.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Whether the token has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_untripped() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_trips_the_token() {
        let token = CancellationToken::new();
        assert!(token.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_reports_first_trigger_only() {
        let token = CancellationToken::new();
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(!token.cancel());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let observer = token.clone();

        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn independent_tokens_do_not_interfere() {
        let a = CancellationToken::new();
        let b = CancellationToken::new();

        a.cancel();
        assert!(!b.is_cancelled());
    }
}
