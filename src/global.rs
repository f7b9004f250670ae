//! Process-wide measurement API.
//!
//! Each thread gets its own [`Tracker`], so measurements made on different
//! threads never share a stack. The reporting mode is shared by the whole
//! process and is read again on every reporting decision by trackers that do
//! not pin their own mode.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use crate::config::ReportMode;
use crate::error::TrackerResult;
use crate::result::RepeatedMeasurement;
use crate::tracker::{iteration_label, Tracker};

const MODE_UNSET: u8 = 0;
const MODE_SILENT: u8 = 1;
const MODE_VERBOSE: u8 = 2;

static REPORT_MODE: AtomicU8 = AtomicU8::new(MODE_UNSET);

thread_local! {
    static TRACKER: RefCell<Tracker> = RefCell::new(Tracker::new());
}

fn encode(mode: ReportMode) -> u8 {
    match mode {
        ReportMode::Silent => MODE_SILENT,
        ReportMode::Verbose => MODE_VERBOSE,
    }
}

/// The process-wide reporting mode.
///
/// Until [`set_report_mode`] is called, this is taken from the
/// `NESTWATCH_REPORT` environment variable, defaulting to verbose.
pub fn report_mode() -> ReportMode {
    match REPORT_MODE.load(Ordering::Relaxed) {
        MODE_SILENT => ReportMode::Silent,
        MODE_VERBOSE => ReportMode::Verbose,
        _ => {
            let mode = ReportMode::from_env().unwrap_or_default();
            // Lose the race quietly if another thread set the mode meanwhile.
            match REPORT_MODE.compare_exchange(
                MODE_UNSET,
                encode(mode),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => mode,
                Err(MODE_SILENT) => ReportMode::Silent,
                Err(_) => ReportMode::Verbose,
            }
        }
    }
}

/// Set the process-wide reporting mode.
///
/// Takes effect for subsequent operations on every thread; measurements
/// already reported are unaffected.
pub fn set_report_mode(mode: ReportMode) {
    REPORT_MODE.store(encode(mode), Ordering::Relaxed);
}

/// Run `f` with this thread's tracker, e.g. to change its reporter or
/// configuration.
///
/// # Panics
///
/// Panics if `f` calls back into the process-wide API.
pub fn configure<R>(f: impl FnOnce(&mut Tracker) -> R) -> R {
    TRACKER.with(|tracker| f(&mut tracker.borrow_mut()))
}

/// Start a measurement on this thread's tracker.
pub fn begin<'n>(name: impl Into<Option<&'n str>>) {
    configure(|tracker| tracker.begin(name));
}

/// Stop the innermost measurement on this thread's tracker.
///
/// # Panics
///
/// Panics if no measurement is open.
#[track_caller]
pub fn end() -> Duration {
    match try_end() {
        Ok(elapsed) => elapsed,
        Err(err) => panic!("{}", err),
    }
}

/// Stop the innermost measurement, or fail if none is open.
pub fn try_end() -> TrackerResult<Duration> {
    configure(|tracker| tracker.try_end())
}

/// Number of open measurements on this thread.
pub fn depth() -> usize {
    configure(|tracker| tracker.depth())
}

/// Time a block.
///
/// Measurements made inside `block` through this module nest under this
/// one. The measurement is closed even if `block` panics.
pub fn measure<'n>(name: impl Into<Option<&'n str>>, block: impl FnOnce()) -> Duration {
    let scope = GlobalScope::enter(name);
    block();
    scope.exit()
}

/// Run a block `iterations` times and return the mean duration.
///
/// # Panics
///
/// Panics if `iterations` is zero.
#[track_caller]
pub fn measure_n<'n>(
    name: impl Into<Option<&'n str>>,
    iterations: usize,
    block: impl FnMut(),
) -> Duration {
    collect(name, iterations, block).mean()
}

/// [`measure_n`] with this thread's configured iteration count (10 unless
/// changed through [`configure`]).
pub fn measure_repeated<'n>(name: impl Into<Option<&'n str>>, block: impl FnMut()) -> Duration {
    let iterations = configure(|tracker| tracker.config().iterations);
    measure_n(name, iterations, block)
}

/// Run a block `iterations` times and return every sample with its summary.
///
/// # Panics
///
/// Panics if `iterations` is zero.
#[track_caller]
pub fn collect<'n>(
    name: impl Into<Option<&'n str>>,
    iterations: usize,
    mut block: impl FnMut(),
) -> RepeatedMeasurement {
    if iterations == 0 {
        panic!("{}", crate::error::TrackerError::InvalidIterations);
    }
    let name = name.into();
    let mut scope = GlobalRepeatedScope::enter(name, iterations);
    for i in 0..iterations {
        let label = iteration_label(name, i);
        let took = measure(label.as_deref(), &mut block);
        scope.samples.push(took.as_secs_f64());
    }
    scope.exit()
}

/// Keeps a process-wide measurement balanced if the measured block unwinds.
struct GlobalScope {
    depth: usize,
    open: bool,
}

impl GlobalScope {
    fn enter<'n>(name: impl Into<Option<&'n str>>) -> Self {
        let depth = configure(|tracker| {
            tracker.begin(name);
            tracker.depth()
        });
        Self { depth, open: true }
    }

    fn exit(mut self) -> Duration {
        self.open = false;
        end()
    }
}

impl Drop for GlobalScope {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        let depth = self.depth;
        // The thread-local may already be gone during thread teardown, and a
        // panic inside a tracker call can leave it borrowed.
        let _ = TRACKER.try_with(|tracker| {
            if let Ok(mut tracker) = tracker.try_borrow_mut() {
                tracker.unwind_to(depth);
            }
        });
    }
}

struct GlobalRepeatedScope {
    name: Option<String>,
    depth: usize,
    samples: Vec<f64>,
    open: bool,
}

impl GlobalRepeatedScope {
    fn enter(name: Option<&str>, iterations: usize) -> Self {
        let depth = configure(|tracker| tracker.open_repeated(name));
        Self {
            name: name.map(str::to_owned),
            depth,
            samples: Vec::with_capacity(iterations),
            open: true,
        }
    }

    fn exit(mut self) -> RepeatedMeasurement {
        self.open = false;
        let name = self.name.take();
        let samples = std::mem::take(&mut self.samples);
        let depth = self.depth;
        configure(|tracker| tracker.close_repeated(name, depth, samples))
    }
}

impl Drop for GlobalRepeatedScope {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        let depth = self.depth;
        let _ = TRACKER.try_with(|tracker| {
            if let Ok(mut tracker) = tracker.try_borrow_mut() {
                tracker.abandon_repeated(depth);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_load() {
        assert_eq!(encode(ReportMode::Silent), MODE_SILENT);
        assert_eq!(encode(ReportMode::Verbose), MODE_VERBOSE);
        assert_ne!(MODE_UNSET, MODE_SILENT);
        assert_ne!(MODE_UNSET, MODE_VERBOSE);
    }

    #[test]
    fn test_threads_have_independent_stacks() {
        configure(|t| t.set_mode(ReportMode::Silent));
        begin("main thread");

        let other = std::thread::spawn(|| {
            configure(|t| t.set_mode(ReportMode::Silent));
            assert_eq!(depth(), 0);
            measure("worker", || {
                assert_eq!(depth(), 1);
            });
            depth()
        })
        .join()
        .unwrap();

        assert_eq!(other, 0);
        assert_eq!(depth(), 1);
        end();
        assert_eq!(depth(), 0);
    }
}
