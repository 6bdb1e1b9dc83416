use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Cooperative cancellation flag shared between a periodic task and its owner
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Periodic timer that checks a [CancelToken] on every wake-up. The first
/// tick fires one period after creation. Must be created from within a tokio
/// runtime.
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
    token: CancelToken,
}

impl Ticker {
    pub fn new(period: Duration, token: CancelToken) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled consumer should slow the signal down, not replay a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, token }
    }

    /// Wait for the next tick. Returns false once the token has been
    /// cancelled, in which case no further ticks should be produced.
    pub async fn tick(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.interval.tick().await;
        !self.token.is_cancelled()
    }
}
