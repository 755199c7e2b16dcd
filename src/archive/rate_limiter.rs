//! Minimum-interval rate limiter for outbound metadata requests.
//!
//! The remote service asks for at most one request per second. Every caller
//! awaits [`RateLimiter::acquire`] before sending; callers are released one at
//! a time, each at least `min_interval` after the previous one.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Default spacing between outbound calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Shared limiter; clone an `Arc` of it into every task that fetches.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// When the last permit was handed out
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request may be sent.
    ///
    /// The lock is held across the sleep so waiters queue up in order.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Time until the next permit, without taking one.
    pub async fn wait_time(&self) -> Duration {
        let last = self.last.lock().await;
        match *last {
            Some(previous) => (previous + self.min_interval).saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.wait_time().await, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_acquires_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(1000));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_are_serialized() {
        let limiter = Arc::new(RateLimiter::default());
        let start = Instant::now();

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                async move {
                    limiter.acquire().await;
                    Instant::now()
                }
            })
            .collect();
        let mut times = futures::future::join_all(tasks).await;
        times.sort();

        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(1));
        }
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_passed() {
        let limiter = RateLimiter::default();
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(limiter.wait_time().await, Duration::ZERO);

        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
