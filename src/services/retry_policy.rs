use std::time::Duration;
use rand::Rng;
use crate::config::constants::duration_millis;
use crate::structs::config::retry_config::RetryConfig;

/// Attempt budget and backoff schedule for outbound model calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    max_retry_after: Duration,
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, config: &RetryConfig) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: duration_millis(config.base_backoff_ms),
            max_delay: duration_millis(config.max_backoff_ms.max(config.base_backoff_ms)),
            max_retry_after: duration_millis(config.max_retry_after_ms),
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide after the `attempt`-th failure (1-based).
    ///
    /// Non-transient failures and an exhausted budget give up. A server wait hint
    /// longer than `max_retry_after` gives up rather than stalling the caller.
    pub fn decide(&self, attempt: u32, transient: bool, retry_after: Option<Duration>) -> RetryDecision {
        if !transient || attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }

        let backoff = self.jittered(self.backoff(attempt));
        match retry_after {
            Some(hint) if hint > self.max_retry_after => RetryDecision::GiveUp,
            Some(hint) => RetryDecision::RetryAfter(backoff.max(hint)),
            None => RetryDecision::RetryAfter(backoff),
        }
    }

    /// Exponential delay before retry number `attempt`, capped at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        let spread = u64::try_from(delay.as_millis() / 2).unwrap_or(u64::MAX);
        if spread == 0 {
            return delay;
        }
        let extra = rand::thread_rng().gen_range(0..=spread);
        delay + Duration::from_millis(extra)
    }
}
