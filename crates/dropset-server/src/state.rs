//! Shared application state for the waitlist server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use dropset_core::waitlist::Waitlist;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Registrant set and submission rate limiter.
    pub waitlist: Arc<Waitlist>,
}

impl AppState {
    /// Wrap a waitlist for sharing across handlers.
    #[must_use]
    pub fn new(waitlist: Waitlist) -> Self {
        Self {
            waitlist: Arc::new(waitlist),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
