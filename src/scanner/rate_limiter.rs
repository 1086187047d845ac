//! Probe pacing for network sweeps.
//!
//! Wraps a token bucket so a sweep can cap how many address surveys start
//! per second, independently of the concurrency bound. Useful on networks
//! where a burst of connects trips intrusion detection or flaky switches.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// A token-bucket pacer for address surveys.
pub struct RateLimiter {
    limiter: Arc<
        GovLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl RateLimiter {
    /// Create a pacer allowing `rate` surveys per second.
    ///
    /// # Panics
    /// Panics if rate is 0. Use `Option<RateLimiter>` for optional pacing.
    pub fn new(rate: u32) -> Self {
        let rate = NonZeroU32::new(rate).expect("rate must be > 0");
        let quota = Quota::per_second(rate);

        Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        }
    }

    /// Wait until the next survey may start.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a token without waiting.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            limiter: Arc::clone(&self.limiter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_token_is_immediate() {
        let limiter = RateLimiter::new(100);
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_wait_completes() {
        let limiter = RateLimiter::new(1000);
        limiter.wait().await;
    }

    #[test]
    fn test_clones_share_a_bucket() {
        let a = RateLimiter::new(1);
        let b = a.clone();
        assert!(a.try_acquire());
        assert!(!b.try_acquire());
    }
}
