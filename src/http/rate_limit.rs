//! Commit rate limiting
//!
//! A direct (unkeyed) governor limiter shared by every request the client
//! makes. The bucket holds one second's worth of permits.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Token bucket limiting requests per second
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Allow at most `n` requests in any one second
    pub fn per_second(n: NonZeroU32) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(Quota::per_second(n))),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_burst_within_quota_is_immediate() {
        let limiter = RateLimiter::per_second(NonZeroU32::new(50).unwrap());
        let started = Instant::now();
        for _ in 0..10 {
            limiter.wait().await;
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_waits_once_quota_is_spent() {
        let limiter = RateLimiter::per_second(NonZeroU32::new(10).unwrap());
        for _ in 0..10 {
            limiter.wait().await;
        }

        // the eleventh permit replenishes after 100ms
        let started = Instant::now();
        limiter.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
