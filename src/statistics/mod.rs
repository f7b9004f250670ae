//! Statistical summaries for repeated measurements.
//!
//! Population statistics only: a repeated measurement observes every
//! iteration it ran, so there is no sample/population distinction to make.

mod summary;

pub use summary::{mean, population_variance, Summary};
