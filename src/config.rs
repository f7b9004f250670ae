//! Configuration for the measurement tracker.
//!
//! The only setting that matters to the original stopwatch semantics is the
//! reporting mode. Everything else here has a default that reproduces it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Environment variable consulted for the initial process-wide reporting mode.
pub const REPORT_ENV_VAR: &str = "NESTWATCH_REPORT";

/// Default number of iterations for a repeated measurement.
pub const DEFAULT_ITERATIONS: usize = 10;

/// How measurements are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Print nothing. Durations are still measured and returned.
    Silent,
    /// Print announcement, per-measurement and summary lines.
    #[default]
    Verbose,
}

impl ReportMode {
    /// Whether lines should be emitted in this mode.
    pub fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Read the mode from [`REPORT_ENV_VAR`].
    ///
    /// Returns `None` if the variable is unset or empty. Unrecognised values
    /// are logged and treated as unset.
    pub fn from_env() -> Option<Self> {
        let value = std::env::var(REPORT_ENV_VAR).ok()?;
        if value.trim().is_empty() {
            return None;
        }
        match value.parse() {
            Ok(mode) => Some(mode),
            Err(err) => {
                tracing::warn!("ignoring {}={:?}: {}", REPORT_ENV_VAR, value, err);
                None
            }
        }
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "none" | "off" | "0" | "false" | "no" => Ok(Self::Silent),
            "verbose" | "print" | "on" | "1" | "true" | "yes" => Ok(Self::Verbose),
            other => Err(format!("unknown report mode '{}'", other)),
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

/// Statistic printed on the `STD Dev.` summary line.
///
/// The line has always been labelled "STD Dev." but historically carried the
/// population *variance* (no square root). `Variance` keeps that output so
/// existing log scrapers see the same numbers; `StandardDeviation` prints the
/// square root instead. The label is the same in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spread {
    /// Population variance, in seconds squared (legacy output).
    #[default]
    Variance,
    /// Population standard deviation, in seconds.
    StandardDeviation,
}

/// Configuration options for a [`Tracker`](crate::Tracker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reporting mode override.
    ///
    /// `None` follows the process-wide mode (see
    /// [`set_report_mode`](crate::set_report_mode)), re-read on every
    /// reporting decision. Default: None.
    pub mode: Option<ReportMode>,

    /// Iterations used by `measure_repeated`. Default: 10.
    pub iterations: usize,

    /// Statistic printed on the `STD Dev.` line. Default: [`Spread::Variance`].
    pub spread: Spread,

    /// Colour the default terminal reporter's output. Default: false.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: None,
            iterations: DEFAULT_ITERATIONS,
            spread: Spread::Variance,
            color: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that never prints, regardless of the process-wide mode.
    pub fn silent() -> Self {
        Self {
            mode: Some(ReportMode::Silent),
            ..Default::default()
        }
    }

    /// Configuration that always prints, regardless of the process-wide mode.
    pub fn verbose() -> Self {
        Self {
            mode: Some(ReportMode::Verbose),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Pin the reporting mode for this tracker.
    pub fn mode(mut self, mode: ReportMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the default iteration count.
    pub fn iterations(mut self, iterations: usize) -> Self {
        assert!(iterations > 0, "iterations must be positive");
        self.iterations = iterations;
        self
    }

    /// Set the statistic printed on the `STD Dev.` line.
    pub fn spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    /// Enable or disable ANSI colours.
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.iterations == 0 {
            return Err(TrackerError::InvalidIterations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mode, None);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.spread, Spread::Variance);
        assert!(!config.color);
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(Config::silent().mode, Some(ReportMode::Silent));
        assert_eq!(Config::verbose().mode, Some(ReportMode::Verbose));
        assert_eq!(Config::silent().iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new()
            .mode(ReportMode::Silent)
            .iterations(3)
            .spread(Spread::StandardDeviation)
            .color(true);

        assert_eq!(config.mode, Some(ReportMode::Silent));
        assert_eq!(config.iterations, 3);
        assert_eq!(config.spread, Spread::StandardDeviation);
        assert!(config.color);
    }

    #[test]
    fn test_validation() {
        assert!(Config::default().validate().is_ok());

        let mut invalid = Config::default();
        invalid.iterations = 0;
        assert_eq!(invalid.validate(), Err(TrackerError::InvalidIterations));
    }

    #[test]
    #[should_panic(expected = "iterations must be positive")]
    fn test_invalid_iterations() {
        Config::new().iterations(0);
    }

    #[test]
    fn test_parse_report_mode() {
        assert_eq!("silent".parse::<ReportMode>(), Ok(ReportMode::Silent));
        assert_eq!(" Verbose ".parse::<ReportMode>(), Ok(ReportMode::Verbose));
        assert_eq!("0".parse::<ReportMode>(), Ok(ReportMode::Silent));
        assert_eq!("yes".parse::<ReportMode>(), Ok(ReportMode::Verbose));
        assert!("loud".parse::<ReportMode>().is_err());
    }

    #[test]
    fn test_report_mode_display_roundtrip() {
        for mode in [ReportMode::Silent, ReportMode::Verbose] {
            assert_eq!(mode.to_string().parse::<ReportMode>(), Ok(mode));
        }
        assert!(ReportMode::Verbose.is_verbose());
        assert!(!ReportMode::Silent.is_verbose());
    }
}
