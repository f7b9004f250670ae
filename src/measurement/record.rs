//! The record kept on the stack for every open measurement.

use std::time::{Duration, Instant};

/// One open timing span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Instant captured when the measurement began.
    pub start: Instant,
    /// Label; anonymous measurements are never reported by name.
    pub name: Option<String>,
    /// Set once this record has been announced as the container of a child.
    pub reported: bool,
}

impl Measurement {
    /// Create a new, unreported record.
    pub fn new(start: Instant, name: Option<String>) -> Self {
        Self {
            start,
            name,
            reported: false,
        }
    }

    /// Time elapsed between `start` and `end`.
    ///
    /// Saturates to zero if `end` precedes `start`.
    pub fn elapsed_at(&self, end: Instant) -> Duration {
        end.saturating_duration_since(self.start)
    }
}
