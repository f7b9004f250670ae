//! Measurement infrastructure.
//!
//! This module provides:
//! - Clock sources (system monotonic clock, manual clock for tests)
//! - The per-measurement record kept on the tracker's stack

mod clock;
mod record;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use record::Measurement;
