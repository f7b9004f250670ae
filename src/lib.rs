//! # nestwatch
//!
//! A nestable stopwatch for timing named blocks of code.
//!
//! Measurements nest: one started while another is open becomes its child
//! and is reported one indent level deeper. A block can also be run several
//! times to report the mean and spread of its duration.
//!
//! ## Quick Start
//!
//! ```no_run
//! use nestwatch::{measure, measure_n};
//!
//! measure("load", || {
//!     measure("parse", || { /* ... */ });
//!     measure("index", || { /* ... */ });
//! });
//!
//! let mean = measure_n("sort", 5, || {
//!     let mut v: Vec<u32> = (0..10_000).rev().collect();
//!     v.sort();
//! });
//! println!("mean: {:?}", mean);
//! ```
//!
//! prints
//!
//! ```text
//! Measuring load:
//! 	parse took: 1.20ms
//! 	index took: 3.41ms
//! load took: 4.66ms
//! Measuring sort
//! 	Iteration 1 took: 0.35ms
//! 	...
//! sort Average 0.34ms
//! sort STD Dev. 0.00ms
//! ```
//!
//! ## Reporting
//!
//! Output is controlled by the process-wide [`ReportMode`]: `Verbose` (the
//! default) prints, `Silent` only measures. Set it with [`set_report_mode`]
//! or the `NESTWATCH_REPORT` environment variable.
//!
//! The `STD Dev.` line carries the population *variance* unless the tracker
//! is configured with [`Spread::StandardDeviation`].
//!
//! ## Explicit trackers
//!
//! The free functions use a per-thread [`Tracker`]. Create one directly to
//! pick a clock, a reporter or a configuration:
//!
//! ```
//! use nestwatch::{output::BufferReporter, Config, Tracker};
//!
//! let buffer = BufferReporter::new();
//! let mut tracker = Tracker::with_config(Config::verbose()).with_reporter(buffer.clone());
//! tracker.measure("outer", |t| {
//!     t.measure("inner", |_| {});
//! });
//! assert_eq!(buffer.lines()[0], "Measuring outer:");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod global;
mod result;
mod tracker;

// Functional modules
pub mod measurement;
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use config::{Config, ReportMode, Spread, DEFAULT_ITERATIONS, REPORT_ENV_VAR};
pub use error::{TrackerError, TrackerResult};
pub use global::{
    begin, collect, configure, depth, end, measure, measure_n, measure_repeated, report_mode,
    set_report_mode, try_end,
};
pub use measurement::{Clock, ManualClock, Measurement, MonotonicClock};
pub use result::RepeatedMeasurement;
pub use statistics::Summary;
pub use tracker::{Scope, Tracker};
