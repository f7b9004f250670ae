//! The measurement tracker: a stack of in-flight measurements.
//!
//! A measurement started while another one is open becomes its child. When
//! the first child of a named measurement begins, the parent is announced
//! once ("Measuring <name>:"), so its header appears right before the lines
//! of its children. Closing a named measurement reports how long it took,
//! indented one tab per enclosing measurement.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::config::{Config, ReportMode};
use crate::error::{TrackerError, TrackerResult};
use crate::measurement::{Clock, Measurement, MonotonicClock};
use crate::output::{Event, Reporter, TerminalReporter};
use crate::result::RepeatedMeasurement;
use crate::statistics::Summary;

/// Tracks nested measurements.
///
/// # Example
///
/// ```
/// use nestwatch::{Config, Tracker};
///
/// let mut tracker = Tracker::with_config(Config::silent());
/// let took = tracker.measure("outer", |t| {
///     t.measure("inner", |_| {
///         std::hint::black_box(40 + 2);
///     });
/// });
/// assert!(tracker.is_idle());
/// assert!(took >= std::time::Duration::ZERO);
/// ```
pub struct Tracker<C: Clock = MonotonicClock> {
    stack: Vec<Measurement>,
    config: Config,
    clock: C,
    reporter: Box<dyn Reporter>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    /// Create with default configuration, printing to stdout.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create with the given configuration, printing to stdout.
    pub fn with_config(config: Config) -> Self {
        Self::with_clock(config, MonotonicClock)
    }
}

impl<C: Clock> Tracker<C> {
    /// Create with the given configuration and clock, printing to stdout.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (see [`Config::validate`]).
    #[track_caller]
    pub fn with_clock(config: Config, clock: C) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid tracker configuration: {}", err);
        }
        let reporter = if config.color {
            TerminalReporter::colored()
        } else {
            TerminalReporter::new()
        };
        Self {
            stack: Vec::new(),
            config,
            clock,
            reporter: Box::new(reporter),
        }
    }

    /// Replace the reporter.
    pub fn with_reporter<R: Reporter + 'static>(mut self, reporter: R) -> Self {
        self.set_reporter(reporter);
        self
    }

    /// Replace the reporter in place.
    pub fn set_reporter<R: Reporter + 'static>(&mut self, reporter: R) {
        self.reporter = Box::new(reporter);
    }

    /// The tracker's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The tracker's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Effective reporting mode.
    ///
    /// The configured override if there is one, the process-wide mode
    /// otherwise.
    pub fn mode(&self) -> ReportMode {
        self.config.mode.unwrap_or_else(crate::global::report_mode)
    }

    /// Pin the reporting mode of this tracker. Applies to subsequent
    /// operations only.
    pub fn set_mode(&mut self, mode: ReportMode) {
        self.config.mode = Some(mode);
    }

    /// Number of open measurements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether no measurement is open.
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// The innermost open measurement.
    pub fn current(&self) -> Option<&Measurement> {
        self.stack.last()
    }

    fn emit(&mut self, event: Event) {
        self.reporter.report(&event);
    }

    // =========================================================================
    // Stack discipline
    // =========================================================================

    /// Start a measurement. Measurements nest.
    ///
    /// Anonymous measurements (`None`) are timed but never reported.
    pub fn begin<'n>(&mut self, name: impl Into<Option<&'n str>>) {
        let name = name.into().map(str::to_owned);
        self.push(name, false);
    }

    fn push(&mut self, name: Option<String>, reported: bool) {
        if self.mode().is_verbose() {
            self.announce_container();
        }
        tracing::trace!(
            depth = self.stack.len(),
            name = name.as_deref().unwrap_or_default(),
            "begin measurement"
        );
        let start = self.clock.now();
        self.stack.push(Measurement {
            start,
            name,
            reported,
        });
    }

    fn announce_container(&mut self) {
        let depth = self.stack.len().saturating_sub(1);
        let Some(container) = self.stack.last_mut() else {
            return;
        };
        if container.reported {
            return;
        }
        container.reported = true;
        if let Some(name) = container.name.clone() {
            self.emit(Event::Announce { name, depth });
        }
    }

    /// Stop the innermost measurement and return how long it took.
    ///
    /// # Panics
    ///
    /// Panics if no measurement is open.
    #[track_caller]
    pub fn end(&mut self) -> Duration {
        match self.try_end() {
            Ok(elapsed) => elapsed,
            Err(err) => panic!("{}", err),
        }
    }

    /// Stop the innermost measurement, or fail if none is open.
    pub fn try_end(&mut self) -> TrackerResult<Duration> {
        let now = self.clock.now();
        let record = self.stack.pop().ok_or(TrackerError::EmptyStack)?;
        let elapsed = record.elapsed_at(now);
        let depth = self.stack.len();

        tracing::trace!(
            depth,
            name = record.name.as_deref().unwrap_or_default(),
            elapsed_ns = elapsed.as_nanos() as u64,
            "end measurement"
        );

        if self.mode().is_verbose() {
            if let Some(name) = record.name {
                self.emit(Event::Took {
                    name,
                    depth,
                    elapsed_secs: elapsed.as_secs_f64(),
                });
            }
        }
        Ok(elapsed)
    }

    /// Start a measurement that ends when the returned guard is finished or
    /// dropped.
    ///
    /// The guard derefs to the tracker, so nested measurements can be made
    /// through it.
    pub fn scope<'n>(&mut self, name: impl Into<Option<&'n str>>) -> Scope<'_, C> {
        self.begin(name);
        let depth = self.depth();
        Scope {
            tracker: self,
            depth,
            open: true,
        }
    }

    /// Time a block.
    ///
    /// The block receives the tracker so it can nest further measurements.
    /// If the block panics, the measurement is still closed before the panic
    /// propagates.
    pub fn measure<'n, F>(&mut self, name: impl Into<Option<&'n str>>, block: F) -> Duration
    where
        F: FnOnce(&mut Self),
    {
        let mut scope = self.scope(name);
        block(&mut *scope);
        scope.finish()
    }

    // =========================================================================
    // Repeated measurements
    // =========================================================================

    /// Run a block `iterations` times and return the mean duration.
    ///
    /// Each iteration is a nested measurement. A named repeated measurement
    /// reports every iteration followed by the average and the `STD Dev.`
    /// line (see [`Spread`](crate::Spread)).
    ///
    /// # Panics
    ///
    /// Panics if `iterations` is zero.
    #[track_caller]
    pub fn measure_n<'n, F>(
        &mut self,
        name: impl Into<Option<&'n str>>,
        iterations: usize,
        block: F,
    ) -> Duration
    where
        F: FnMut(&mut Self),
    {
        self.collect(name, iterations, block).mean()
    }

    /// [`measure_n`](Self::measure_n) with the configured iteration count
    /// (10 unless changed).
    pub fn measure_repeated<'n, F>(&mut self, name: impl Into<Option<&'n str>>, block: F) -> Duration
    where
        F: FnMut(&mut Self),
    {
        let iterations = self.config.iterations;
        self.measure_n(name, iterations, block)
    }

    /// Run a block `iterations` times and return every sample with its
    /// summary statistics.
    ///
    /// Reports exactly what [`measure_n`](Self::measure_n) reports.
    ///
    /// # Panics
    ///
    /// Panics if `iterations` is zero.
    #[track_caller]
    pub fn collect<'n, F>(
        &mut self,
        name: impl Into<Option<&'n str>>,
        iterations: usize,
        mut block: F,
    ) -> RepeatedMeasurement
    where
        F: FnMut(&mut Self),
    {
        if iterations == 0 {
            panic!("{}", TrackerError::InvalidIterations);
        }
        let name = name.into();
        let mut scope = RepeatedScope::open(self, name, iterations);
        for i in 0..iterations {
            let label = iteration_label(name, i);
            let took = scope.measure(label.as_deref(), &mut block);
            scope.samples.push(took.as_secs_f64());
        }
        scope.finish()
    }

    /// Announce a repeated measurement and open its container record.
    ///
    /// Returns the depth the repeated measurement started at.
    pub(crate) fn open_repeated(&mut self, name: Option<&str>) -> usize {
        let depth = self.depth();
        if self.mode().is_verbose() {
            self.announce_container();
            if let Some(name) = name {
                self.emit(Event::Header {
                    name: name.to_owned(),
                    depth,
                });
            }
        }
        // The container is never announced or reported as "took"; it only
        // shifts the iterations one level deeper than the header and summary.
        self.push(name.map(str::to_owned), true);
        depth
    }

    /// Close the container opened by [`open_repeated`](Self::open_repeated)
    /// and report the summary.
    pub(crate) fn close_repeated(
        &mut self,
        name: Option<String>,
        depth: usize,
        samples: Vec<f64>,
    ) -> RepeatedMeasurement {
        self.abandon_repeated(depth);

        let summary = Summary::from_samples(&samples);
        tracing::debug!(
            name = name.as_deref().unwrap_or_default(),
            iterations = summary.count,
            mean_secs = summary.mean,
            variance = summary.variance,
            "repeated measurement finished"
        );

        if self.mode().is_verbose() {
            if let Some(name) = &name {
                let spread = self.config.spread;
                self.emit(Event::Summary {
                    name: name.clone(),
                    depth,
                    mean_secs: summary.mean,
                    spread_secs: summary.spread(spread),
                    spread,
                });
            }
        }

        RepeatedMeasurement {
            name,
            samples,
            summary,
        }
    }

    /// Silently drop the container and anything left open above it.
    pub(crate) fn abandon_repeated(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    /// Close everything at or above `depth`, reporting as usual.
    pub(crate) fn unwind_to(&mut self, depth: usize) {
        while self.depth() >= depth && self.try_end().is_ok() {}
    }
}

impl<C: Clock> std::fmt::Debug for Tracker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("stack", &self.stack)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Name of the `i`th (0-based) iteration of a repeated measurement.
///
/// Iterations of an anonymous repeated measurement are anonymous too.
pub(crate) fn iteration_label(name: Option<&str>, i: usize) -> Option<String> {
    name.map(|_| format!("Iteration {}", i + 1))
}

/// An open measurement that closes when finished or dropped.
///
/// Created by [`Tracker::scope`].
pub struct Scope<'t, C: Clock = MonotonicClock> {
    tracker: &'t mut Tracker<C>,
    depth: usize,
    open: bool,
}

impl<C: Clock> Scope<'_, C> {
    /// Close the measurement and return how long it took.
    pub fn finish(mut self) -> Duration {
        self.open = false;
        self.tracker.end()
    }
}

impl<C: Clock> Deref for Scope<'_, C> {
    type Target = Tracker<C>;

    fn deref(&self) -> &Self::Target {
        &*self.tracker
    }
}

impl<C: Clock> DerefMut for Scope<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.tracker
    }
}

impl<C: Clock> Drop for Scope<'_, C> {
    fn drop(&mut self) {
        if self.open {
            self.tracker.unwind_to(self.depth);
        }
    }
}

/// An open repeated measurement.
struct RepeatedScope<'t, C: Clock> {
    tracker: &'t mut Tracker<C>,
    name: Option<String>,
    depth: usize,
    samples: Vec<f64>,
    open: bool,
}

impl<'t, C: Clock> RepeatedScope<'t, C> {
    fn open(tracker: &'t mut Tracker<C>, name: Option<&str>, iterations: usize) -> Self {
        let depth = tracker.open_repeated(name);
        Self {
            tracker,
            name: name.map(str::to_owned),
            depth,
            samples: Vec::with_capacity(iterations),
            open: true,
        }
    }

    fn finish(mut self) -> RepeatedMeasurement {
        self.open = false;
        let name = self.name.take();
        let samples = std::mem::take(&mut self.samples);
        self.tracker.close_repeated(name, self.depth, samples)
    }
}

impl<C: Clock> Deref for RepeatedScope<'_, C> {
    type Target = Tracker<C>;

    fn deref(&self) -> &Self::Target {
        &*self.tracker
    }
}

impl<C: Clock> DerefMut for RepeatedScope<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.tracker
    }
}

impl<C: Clock> Drop for RepeatedScope<'_, C> {
    fn drop(&mut self) {
        if self.open {
            self.tracker.abandon_repeated(self.depth);
        }
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for balanced begin/end sequences: `true` is begin, `false` is end.
    fn balanced_ops(max_pairs: usize) -> impl Strategy<Value = Vec<bool>> {
        prop::collection::vec(any::<bool>(), 0..=max_pairs * 2).prop_map(|raw| {
            let mut ops = Vec::with_capacity(raw.len() * 2);
            let mut open = 0usize;
            for begin in raw {
                if begin || open == 0 {
                    ops.push(true);
                    open += 1;
                } else {
                    ops.push(false);
                    open -= 1;
                }
            }
            ops.extend(std::iter::repeat(false).take(open));
            ops
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any balanced sequence returns the tracker to idle, and depth
        /// tracks the number of open measurements at every step
        #[test]
        fn prop_balanced_sequence_returns_to_idle(ops in balanced_ops(50)) {
            let mut tracker = Tracker::with_config(Config::silent());
            let mut expected = 0usize;
            for begin in ops {
                if begin {
                    tracker.begin("step");
                    expected += 1;
                } else {
                    tracker.end();
                    expected -= 1;
                }
                prop_assert_eq!(tracker.depth(), expected);
            }
            prop_assert!(tracker.is_idle());
        }
    }
}
