//! Request spacing for the external catalog service

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Enforces a minimum interval between granted turns.
///
/// The grant timestamp is recorded after the sleep, not before, so
/// back-to-back callers can never be spaced closer than the interval
/// even if callers become concurrent later.
pub struct RateLimiter {
    last_grant: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_grant: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Block until at least the configured interval has elapsed since
    /// the previous granted turn, then record the new grant time.
    pub async fn await_turn(&self) {
        let mut last = self.last_grant.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}
