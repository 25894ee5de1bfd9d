//! Rate-limiting gates for high-frequency pointer input.
//!
//! These exist purely to bound callback frequency; every caller must stay
//! correct when the interval is zero.

use std::time::{Duration, Instant};

/// Quiet-period gate: lets an event through only when at least `interval`
/// has passed since the previous event. Backs hover resolution.
#[derive(Debug, Clone)]
pub struct Debounce {
    interval: Duration,
    last_event: Option<Instant>,
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_event: None,
        }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        let quiet = match self.last_event {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        self.last_event = Some(now);
        quiet
    }
}

/// Minimum-spacing gate: lets an event through at most once per
/// `interval`. Backs drag-over probing, which triggers geometry work.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_allowed: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_allowed: None,
        }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        let due = match self.last_allowed {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last_allowed = Some(now);
        }
        due
    }
}
