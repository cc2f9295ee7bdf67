//! Request pacing for playlist services.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

/// Spaces requests to one service at least `interval` apart.
///
/// A single-permit [`Semaphore`] serializes callers; each holder keeps the
/// permit for the full interval before releasing it. Clones share the
/// same pacing.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    interval: Duration,
}

impl RateLimiter {
    /// A limiter allowing at most `requests_per_second` requests per
    /// second. Zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = u64::from(requests_per_second.max(1));
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            interval: Duration::from_millis(1000 / rps),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for a request slot.
    pub async fn acquire(&self) {
        // The semaphore is never closed, so `acquire` cannot fail.
        let Ok(_permit) = self.semaphore.acquire().await else {
            return;
        };
        sleep(self.interval).await;
    }
}
