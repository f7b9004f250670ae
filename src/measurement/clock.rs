//! Clock sources for the tracker.
//!
//! The tracker only needs "now" as a monotonic [`Instant`]. The default is
//! the system monotonic clock; [`ManualClock`] gives tests full control.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Current instant. Successive calls must never go backwards.
    fn now(&self) -> Instant;
}

/// System monotonic clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Every call to [`now`](Clock::now) returns the current reading and then
/// advances it by `step`. With a zero step the clock stands still until
/// [`advance`](ManualClock::advance) is called.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
    step: Duration,
}

impl ManualClock {
    /// Create a clock that stands still.
    pub fn new() -> Self {
        Self::with_step(Duration::ZERO)
    }

    /// Create a clock that advances by `step` after every reading.
    pub fn with_step(step: Duration) -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
            step,
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Total time elapsed on this clock since it was created.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.get();
        self.offset.set(offset + self.step);
        self.base + offset
    }
}
