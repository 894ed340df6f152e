//! Request pacing for the OMDb client.

use std::time::{Duration, Instant};

/// Default spacing between requests.
///
/// OMDb publishes no hard per-second limit, but a UI page fans out into
/// three back-to-back requests and bursts trip its abuse protection.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Minimum-interval pacer shared by all requests of one client.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// When the previous request was released.
    last_release: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: None,
        }
    }

    /// Creates a pacer with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Time still to wait before the next request may go out.
    fn remaining(&self, now: Instant) -> Duration {
        self.last_release.map_or(Duration::ZERO, |last| {
            self.min_interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Waits until the next request is allowed and returns how long it slept.
    pub async fn acquire(&mut self) -> Duration {
        let delay = self.remaining(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.last_release = Some(Instant::now());
        delay
    }
}
