use std::time::{Duration, Instant};

use crate::constants::ATTRACTION_INTERVAL;

/// Periodic timer behind the attraction blink.
///
/// Knows nothing about tabs: the container resumes it when the first tab
/// starts attracting and suspends it when the last one stops, then asks it
/// on every tick whether a frame is due.
#[derive(Debug, Clone)]
pub struct AttractionAnimator {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl Default for AttractionAnimator {
    fn default() -> Self {
        Self::new(ATTRACTION_INTERVAL)
    }
}

impl AttractionAnimator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_frame: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_frame.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking. The first frame is due immediately.
    pub fn resume(&mut self, now: Instant) {
        if self.next_frame.is_none() {
            tracing::debug!("attraction animator started");
            self.next_frame = Some(now);
        }
    }

    pub fn suspend(&mut self) {
        if self.next_frame.take().is_some() {
            tracing::debug!("attraction animator stopped");
        }
    }

    /// Returns true when a frame is due at `now`, scheduling the next one.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_frame else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_frame = Some(next);
        true
    }
}
