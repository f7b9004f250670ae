//! Reporting of measurements.
//!
//! Every line the tracker prints is first built as an [`Event`] and handed
//! to a [`Reporter`]. This module provides:
//! - Terminal: plain (or coloured) text lines on stdout
//! - Tracing: lines forwarded to `tracing` at info level
//! - Buffer: events captured in memory
//! - JSON lines: one serialized event per line

mod json;
mod reporter;
mod terminal;

use serde::{Deserialize, Serialize};

use crate::config::Spread;

pub use json::{to_json, to_json_pretty, JsonLinesReporter};
pub use reporter::{BufferReporter, Reporter, TerminalReporter, TracingReporter};
pub use terminal::{format_event, format_event_colored, format_millis, indent};

/// Something the tracker wants to tell the user.
///
/// `depth` is the nesting level used for indentation. All durations are
/// in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A named measurement received its first nested child.
    Announce {
        /// Name of the containing measurement.
        name: String,
        /// Depth of the containing measurement's parent.
        depth: usize,
    },

    /// A named measurement finished.
    Took {
        /// Measurement name.
        name: String,
        /// Depth after the measurement was closed.
        depth: usize,
        /// Elapsed time in seconds.
        elapsed_secs: f64,
    },

    /// A named repeated measurement is about to run its iterations.
    Header {
        /// Repeated measurement name.
        name: String,
        /// Depth the repeated measurement was started at.
        depth: usize,
    },

    /// A named repeated measurement finished all its iterations.
    Summary {
        /// Repeated measurement name.
        name: String,
        /// Depth the repeated measurement was started at.
        depth: usize,
        /// Mean iteration time in seconds.
        mean_secs: f64,
        /// Value printed on the `STD Dev.` line.
        spread_secs: f64,
        /// Which statistic `spread_secs` holds.
        spread: Spread,
    },
}

impl Event {
    /// Name of the measurement this event is about.
    pub fn name(&self) -> &str {
        match self {
            Self::Announce { name, .. }
            | Self::Took { name, .. }
            | Self::Header { name, .. }
            | Self::Summary { name, .. } => name,
        }
    }

    /// Nesting level used for indentation.
    pub fn depth(&self) -> usize {
        match self {
            Self::Announce { depth, .. }
            | Self::Took { depth, .. }
            | Self::Header { depth, .. }
            | Self::Summary { depth, .. } => *depth,
        }
    }
}
