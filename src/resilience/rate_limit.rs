//! Global pacing of outbound calls to the stats provider.
//!
//! One permit is released per interval, shared by every inbound request.
//! Callers that arrive faster than that queue behind the gate. The wait is
//! unbounded unless the caller asks for [`UpstreamRateLimiter::acquire_within`].

use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Raised when a caller gives up waiting for a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PermitError {
    #[error("no upstream permit within {0:?}")]
    Shed(Duration),
}

/// Process-wide ticking gate in front of the stats provider.
///
/// The first permit becomes available one interval after construction.
/// Ticks that nobody was waiting for are dropped rather than banked, so an
/// idle period yields at most one immediate permit and the ones after it
/// are spaced a full interval apart.
pub struct UpstreamRateLimiter {
    ticker: Mutex<Interval>,
}

impl UpstreamRateLimiter {
    /// Create a limiter releasing one permit every `period`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticker: Mutex::new(ticker),
        }
    }

    /// Wait for the next permit. Never fails.
    ///
    /// Waiters are released one per tick. `Interval::tick` is cancel safe,
    /// so a dropped waiter does not consume a permit.
    pub async fn acquire(&self) {
        let mut ticker = self.ticker.lock().await;
        ticker.tick().await;
    }

    /// Wait for the next permit, giving up after `max_wait`.
    pub async fn acquire_within(&self, max_wait: Duration) -> Result<(), PermitError> {
        time::timeout(max_wait, self.acquire())
            .await
            .map_err(|_| PermitError::Shed(max_wait))
    }
}
