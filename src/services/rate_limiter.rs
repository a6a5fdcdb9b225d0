use governor::{Quota, RateLimiter, Jitter};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Client-side throttle shared by every outbound model call.
#[derive(Clone)]
pub struct ApiRateLimiter {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    burst_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl ApiRateLimiter {
    /// Zero quotas are raised to one request.
    pub fn new(per_minute: u32, burst_per_second: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst_per_second).unwrap_or(NonZeroU32::MIN);

        let limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));
        let burst_limiter = Arc::new(RateLimiter::direct(Quota::per_second(burst)));

        Self {
            limiter,
            burst_limiter,
        }
    }

    pub async fn acquire(&self) {
        self.burst_limiter.until_ready().await;
        self.limiter.until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100))).await;
    }
}
