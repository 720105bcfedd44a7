use std::time::{Duration, Instant};

/// A fixed-period tick scheduler.
///
/// The ticker never reads the clock itself; every operation takes the current
/// time from the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Ticker {
    period: Duration,

    /// When the next tick is due, or `None` if the ticker is stopped
    next_due: Option<Instant>,
}

impl Ticker {
    /// Create a stopped ticker
    pub(crate) fn new(period: Duration) -> Ticker {
        Ticker {
            period,
            next_due: None,
        }
    }

    /// Start ticking, with the first tick due one period after `now`.  A
    /// ticker that is already running keeps its current schedule.
    pub(crate) fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    /// Start ticking afresh, with the first tick due one period after `now`,
    /// whether or not the ticker was running
    pub(crate) fn restart(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub(crate) fn stop(&mut self) {
        self.next_due = None;
    }

    /// Return how long after `now` the next tick is due (zero if it's
    /// overdue), or `None` if the ticker is stopped
    pub(crate) fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// If a tick is due at `now`, schedule the following tick and return true.
    ///
    /// Ticks stay on a fixed cadence, but a caller that falls more than a
    /// whole period behind gets a single tick rather than a burst of them.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                let next = due + self.period;
                self.next_due = Some(if next > now {
                    next
                } else {
                    now + self.period
                });
                true
            }
            _ => false,
        }
    }
}
