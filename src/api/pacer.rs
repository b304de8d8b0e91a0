//! Request pacing
//!
//! Enforces a minimum delay between consecutive outbound requests so the
//! pipeline stays under the provider's rate limit.

use std::time::{Duration, Instant};

/// Tracks when the last request left and how long to wait before the next
#[derive(Debug, Clone)]
pub struct Pacer {
    min_interval: Duration,
    last_request_time: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request_time: None,
        }
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was made at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }

    /// Sleeps until a request is allowed, then records it
    pub async fn wait_turn(&mut self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Pacing outbound request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }
}
