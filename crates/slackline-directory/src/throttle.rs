//! Page-level rate limiting.
//!
//! The fetcher acquires one permit before every page request. This is the
//! only point where a refresh suspends on purpose.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    state::{InMemoryState, NotKeyed},
};

use crate::config::{DEFAULT_BURST, DEFAULT_PAGES_PER_MINUTE, RateConfig};

/// Something that hands out page permits.
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait until the next page may be requested.
    async fn acquire(&self);
}

/// Direct (unkeyed) limiter using the default clock.
pub type SharedRateLimiter =
    Arc<RateLimiter<NotKeyed, InMemoryState, governor::clock::DefaultClock>>;

/// Governor-backed throttle shared by every fetch in the process.
#[derive(Clone)]
pub struct PageThrottle {
    limiter: SharedRateLimiter,
}

impl std::fmt::Debug for PageThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageThrottle").finish_non_exhaustive()
    }
}

impl PageThrottle {
    pub fn new(rate: RateConfig) -> Self {
        let per_minute = NonZeroU32::new(rate.pages_per_minute)
            .or(NonZeroU32::new(DEFAULT_PAGES_PER_MINUTE))
            .unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(rate.burst)
            .or(NonZeroU32::new(DEFAULT_BURST))
            .unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }
}

impl Default for PageThrottle {
    fn default() -> Self {
        Self::new(RateConfig::default())
    }
}

#[async_trait]
impl Throttle for PageThrottle {
    async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

/// A throttle that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

#[async_trait]
impl Throttle for Unthrottled {
    async fn acquire(&self) {}
}
