//! Retry policy for transient device states.
//!
//! A device whose admin UI is in use by another session reports busy; that
//! warrants waiting and resubmitting, unlike a hard failure. The policy
//! pairs a retryable predicate with a backoff schedule so alternatives
//! (exponential, jittered) can be swapped in without touching the protocol
//! client.

use crate::provision::orchestrator::ProvisionOutcome;
use std::time::Duration;

/// Delay schedule between attempts.
#[derive(Debug, Clone)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed(Duration),
    /// Delay grows by `multiplier` after each failed attempt.
    Exponential { initial: Duration, multiplier: u32 },
}

/// Bounded retry of transient outcomes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Total attempts per device, first attempt included.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Delay between attempts under the default policy.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    /// Fixed-delay policy.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Exponential backoff policy.
    pub fn exponential(max_attempts: u32, initial: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Exponential { initial, multiplier },
        }
    }

    /// Total attempts allowed per device.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether an outcome warrants another attempt. Only the busy state is
    /// transient; failures are terminal.
    pub fn retryable(&self, outcome: &ProvisionOutcome) -> bool {
        matches!(outcome, ProvisionOutcome::Busy)
    }

    /// Delay before the attempt that follows `completed_attempts` failures.
    pub fn delay_after(&self, completed_attempts: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { initial, multiplier } => {
                initial * multiplier.saturating_pow(completed_attempts.saturating_sub(1))
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_after(1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(2), Duration::from_secs(5));
    }

    #[test]
    fn test_only_busy_is_retryable() {
        let policy = RetryPolicy::default();
        assert!(policy.retryable(&ProvisionOutcome::Busy));
        assert!(!policy.retryable(&ProvisionOutcome::Success));
        assert!(!policy.retryable(&ProvisionOutcome::Failure("boom".into())));
    }

    #[test]
    fn test_exponential_schedule() {
        let policy = RetryPolicy::exponential(4, Duration::from_secs(2), 2);
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after(3), Duration::from_secs(8));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::fixed(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
    }
}
