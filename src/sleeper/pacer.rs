//! Minimum-interval pacing for outbound Sleeper requests.
//!
//! Sleeper does not publish its rate limits but throttles bursts, so every
//! upstream GET goes through one shared [`RequestPacer`].

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Default spacing between consecutive upstream calls.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct RequestPacer {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Returns no earlier than `interval` after the previous `wait` returned,
    /// yielding the instant recorded for this call.
    ///
    /// The lock is held across the sleep so racing callers queue behind each
    /// other instead of computing the same deadline.
    pub async fn wait(&self) -> Instant {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            sleep_until(prev + self.interval).await;
        }
        let now = Instant::now();
        *last = Some(now);
        now
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL)
    }
}
