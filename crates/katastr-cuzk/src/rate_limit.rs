//! Process-wide token bucket pacing all upstream calls.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota};
use tokio_util::sync::CancellationToken;

use crate::error::CuzkError;

/// Token bucket shared (via `Arc`) by every caller of one [`crate::CuzkClient`].
///
/// Waiters are not served in FIFO order.
pub struct RateLimiter {
    bucket: DefaultDirectRateLimiter,
    period: Duration,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Bucket that refills one token every `period` and holds at most `burst`.
    pub fn new(period: Duration, burst: u32) -> Result<Self, CuzkError> {
        let burst = NonZeroU32::new(burst)
            .ok_or_else(|| CuzkError::InvalidRateLimit("burst is zero".into()))?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| CuzkError::InvalidRateLimit("period is zero".into()))?
            .allow_burst(burst);

        Ok(Self {
            bucket: governor::RateLimiter::direct(quota),
            period,
        })
    }

    /// One call per second with no burst, the registry's published limit.
    pub fn per_second() -> Self {
        Self {
            bucket: governor::RateLimiter::direct(Quota::per_second(NonZeroU32::MIN)),
            period: Duration::from_secs(1),
        }
    }

    /// Waits for a token.
    ///
    /// Returns [`CuzkError::Cancelled`] as soon as `cancel` fires; the token is
    /// not consumed in that case.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), CuzkError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Rate limiter wait cancelled");
                Err(CuzkError::Cancelled)
            }
            _ = self.bucket.until_ready() => Ok(()),
        }
    }
}
