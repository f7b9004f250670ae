//! Mean, variance and standard deviation over a set of samples.

use serde::{Deserialize, Serialize};

use crate::config::Spread;

/// Arithmetic mean of `samples`.
///
/// Returns 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population variance of `samples` around `mean`.
///
/// Divides by `n`, not `n - 1`. Returns 0.0 for an empty slice.
pub fn population_variance(samples: &[f64], mean: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum();
    sum_sq / samples.len() as f64
}

/// Summary statistics of a repeated measurement, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of samples.
    pub count: usize,
    /// Mean duration in seconds.
    pub mean: f64,
    /// Population variance in seconds squared.
    pub variance: f64,
    /// Population standard deviation in seconds.
    pub std_dev: f64,
}

impl Summary {
    /// Summarise a non-empty slice of samples.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    pub fn from_samples(samples: &[f64]) -> Self {
        assert!(!samples.is_empty(), "cannot summarise an empty sample set");
        let mean = mean(samples);
        let variance = population_variance(samples, mean);
        Self {
            count: samples.len(),
            mean,
            variance,
            std_dev: variance.sqrt(),
        }
    }

    /// The value printed on the `STD Dev.` line for the given [`Spread`].
    pub fn spread(&self, spread: Spread) -> f64 {
        match spread {
            Spread::Variance => self.variance,
            Spread::StandardDeviation => self.std_dev,
        }
    }
}
