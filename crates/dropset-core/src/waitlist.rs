//! The waitlist service.
//!
//! A single [`Waitlist`] owns the registrant set and the rate limiter. It is
//! built once at startup and shared across handlers via `Arc`. State lives
//! for the life of the process and is never persisted.

use std::collections::HashSet;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::email;
use crate::error::WaitlistError;
use crate::rate_limit::RateLimiter;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The email was new and has been added.
    Registered { count: usize },
    /// The email was already on the list. Nothing changed.
    AlreadyRegistered { count: usize },
}

impl Submission {
    /// Registrant count at the time of the submission.
    #[must_use]
    pub fn count(&self) -> usize {
        match *self {
            Self::Registered { count } | Self::AlreadyRegistered { count } => count,
        }
    }
}

/// Registrant set plus the limiter that guards it.
pub struct Waitlist {
    registrants: RwLock<HashSet<String>>,
    limiter: RateLimiter,
}

impl Waitlist {
    /// Create an empty waitlist with the default limiter (5 per minute).
    #[must_use]
    pub fn new() -> Self {
        Self::with_limiter(RateLimiter::default())
    }

    /// Create an empty waitlist using the given limiter.
    #[must_use]
    pub fn with_limiter(limiter: RateLimiter) -> Self {
        Self {
            registrants: RwLock::new(HashSet::new()),
            limiter,
        }
    }

    /// Submit an email on behalf of `client_id`.
    ///
    /// `email` is `None` when the caller could not extract a string from the
    /// request. Equivalent to [`admit`](Self::admit) followed by
    /// [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// - [`WaitlistError::RateLimited`] if `client_id` is over its limit.
    /// - [`WaitlistError::InvalidInput`] if the email is missing or malformed.
    pub async fn submit(
        &self,
        client_id: &str,
        email: Option<&str>,
    ) -> Result<Submission, WaitlistError> {
        self.admit(client_id).await?;
        self.register(email).await
    }

    /// Run the rate check for `client_id`, recording the attempt if admitted.
    ///
    /// Every admitted attempt counts, including ones that then fail
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns [`WaitlistError::RateLimited`] if `client_id` is over its limit.
    pub async fn admit(&self, client_id: &str) -> Result<(), WaitlistError> {
        if self.limiter.is_allowed(client_id).await {
            return Ok(());
        }

        warn!(client_id, "waitlist submission rate limited");
        Err(WaitlistError::RateLimited {
            client_id: client_id.to_owned(),
        })
    }

    /// Validate, normalize and add an email without a rate check.
    ///
    /// # Errors
    ///
    /// Returns [`WaitlistError::InvalidInput`] if the email is missing or
    /// malformed. Nothing is written in that case.
    pub async fn register(&self, email: Option<&str>) -> Result<Submission, WaitlistError> {
        let raw = email::validate(email)?;
        let normalized = email::normalize(raw);

        // Check-and-insert under one write guard so identical concurrent
        // submissions register exactly once.
        let mut registrants = self.registrants.write().await;
        let inserted = registrants.insert(normalized);
        let count = registrants.len();
        drop(registrants);

        if inserted {
            info!(email = %raw, count, "new waitlist signup");
            Ok(Submission::Registered { count })
        } else {
            info!(email = %raw, count, "repeat waitlist signup");
            Ok(Submission::AlreadyRegistered { count })
        }
    }

    /// Current number of registrants.
    pub async fn status(&self) -> usize {
        self.registrants.read().await.len()
    }

    /// The limiter guarding submissions.
    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

impl Default for Waitlist {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Waitlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waitlist")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
