//! Per-client sliding-window rate limiter.
//!
//! Each client identifier maps to the instants of its accepted requests.
//! Expiry is lazy: a client's entries are pruned only when that client is
//! checked again. Entries for clients that never return are kept for the
//! life of the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Requests allowed per client within one window.
pub const DEFAULT_MAX_REQUESTS: usize = 5;

/// Length of the trailing window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Admission policy for the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum accepted requests within `window`.
    pub max_requests: usize,
    /// A request older than this no longer counts.
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Sliding-window limiter keyed by client identifier.
///
/// The whole ledger sits behind one mutex, so the prune-count-append
/// sequence for a client is atomic and the in-window count never exceeds
/// [`RateLimitPolicy::max_requests`].
pub struct RateLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    ledger: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter with the given policy and time source.
    #[must_use]
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            ledger: Mutex::new(HashMap::new()),
        }
    }

    /// The policy this limiter enforces.
    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Check whether `client_id` may make another request, recording it if so.
    ///
    /// A request exactly `window` old has expired. A rejected request is not
    /// recorded and does not extend the client's lockout.
    pub async fn is_allowed(&self, client_id: &str) -> bool {
        let mut ledger = self.ledger.lock().await;
        let now = self.clock.now();
        let window = self.policy.window;

        let recent = ledger.entry(client_id.to_owned()).or_default();
        recent.retain(|&at| now.saturating_duration_since(at) < window);

        if recent.len() >= self.policy.max_requests {
            debug!(client_id, in_window = recent.len(), "request over limit");
            return false;
        }

        recent.push(now);
        true
    }

    /// Number of client identifiers with a ledger entry.
    pub async fn tracked_clients(&self) -> usize {
        self.ledger.lock().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default(), Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn make_limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new();
        let limiter = RateLimiter::new(RateLimitPolicy::default(), Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[tokio::test]
    async fn allows_up_to_max_then_rejects() {
        let (limiter, _clock) = make_limiter();
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(limiter.is_allowed("10.0.0.1").await);
        }
        assert!(!limiter.is_allowed("10.0.0.1").await);
    }

    #[tokio::test]
    async fn request_exactly_one_window_old_has_expired() {
        let (limiter, clock) = make_limiter();
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(limiter.is_allowed("c").await);
        }
        clock.advance(DEFAULT_WINDOW - Duration::from_millis(1));
        assert!(!limiter.is_allowed("c").await);

        clock.advance(Duration::from_millis(1));
        assert!(limiter.is_allowed("c").await);
    }

    #[tokio::test]
    async fn sixth_request_allowed_just_after_window() {
        let (limiter, clock) = make_limiter();
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(limiter.is_allowed("c").await);
        }
        clock.advance(Duration::from_millis(60_001));
        assert!(limiter.is_allowed("c").await);
    }

    #[tokio::test]
    async fn rejected_attempts_do_not_consume_slots() {
        let (limiter, clock) = make_limiter();
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(limiter.is_allowed("c").await);
        }

        // Hammering while limited must not push the lockout further out.
        clock.advance(Duration::from_secs(30));
        for _ in 0..10 {
            assert!(!limiter.is_allowed("c").await);
        }

        clock.advance(Duration::from_secs(30));
        assert!(limiter.is_allowed("c").await);
    }

    #[tokio::test]
    async fn window_slides_per_request() {
        let (limiter, clock) = make_limiter();
        // Requests at t = 0s, 10s, 20s, 30s, 40s.
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(limiter.is_allowed("c").await);
            clock.advance(Duration::from_secs(10));
        }
        // t = 50s: all five still in window.
        assert!(!limiter.is_allowed("c").await);

        // t = 60s: only the t = 0s request has expired, one slot frees up.
        clock.advance(Duration::from_secs(10));
        assert!(limiter.is_allowed("c").await);
        assert!(!limiter.is_allowed("c").await);
    }

    #[tokio::test]
    async fn clients_are_limited_independently() {
        let (limiter, _clock) = make_limiter();
        for _ in 0..DEFAULT_MAX_REQUESTS {
            assert!(limiter.is_allowed("a").await);
        }
        assert!(!limiter.is_allowed("a").await);
        assert!(limiter.is_allowed("b").await);
        assert!(limiter.is_allowed("unknown").await);
    }

    #[tokio::test]
    async fn ledger_entries_are_never_evicted() {
        let (limiter, clock) = make_limiter();
        assert!(limiter.is_allowed("a").await);
        assert!(limiter.is_allowed("b").await);
        clock.advance(Duration::from_secs(3600));
        assert_eq!(limiter.tracked_clients().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_checks_never_exceed_limit() {
        let (limiter, _clock) = make_limiter();
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.is_allowed("shared").await })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, DEFAULT_MAX_REQUESTS);
    }

    #[tokio::test]
    async fn custom_policy_is_honored() {
        let clock = ManualClock::new();
        let policy = RateLimitPolicy {
            max_requests: 1,
            window: Duration::from_millis(100),
        };
        let limiter = RateLimiter::new(policy, Arc::new(clock.clone()));

        assert!(limiter.is_allowed("c").await);
        assert!(!limiter.is_allowed("c").await);
        clock.advance(Duration::from_millis(100));
        assert!(limiter.is_allowed("c").await);
        assert_eq!(limiter.policy(), policy);
    }
}
