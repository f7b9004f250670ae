//! Result of a repeated measurement.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::statistics::Summary;

/// Samples and statistics from running a block several times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedMeasurement {
    /// Name of the repeated measurement, if any.
    pub name: Option<String>,
    /// Elapsed time of each iteration in seconds, in execution order.
    pub samples: Vec<f64>,
    /// Population statistics over `samples`.
    pub summary: Summary,
}

impl RepeatedMeasurement {
    /// Mean iteration time.
    pub fn mean(&self) -> Duration {
        Duration::from_secs_f64(self.summary.mean)
    }

    /// Population standard deviation of the iteration times.
    pub fn std_dev(&self) -> Duration {
        Duration::from_secs_f64(self.summary.std_dev)
    }

    /// Number of iterations that ran.
    pub fn iterations(&self) -> usize {
        self.samples.len()
    }
}
