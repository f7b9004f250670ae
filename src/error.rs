//! Error types for the tracker.

/// Error returned by the non-panicking tracker entry points.
///
/// The panicking operations (`end`, `measure_n`, ...) treat these conditions
/// as programming errors. The `try_*` variants and [`Config::validate`]
/// surface them as values instead.
///
/// [`Config::validate`]: crate::Config::validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// `end` was called with no measurement in flight.
    #[error("Attempt to stop a measurement when none has been started")]
    EmptyStack,

    /// A repeated measurement was requested with zero iterations.
    #[error("Iterations must be a positive integer")]
    InvalidIterations,
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
