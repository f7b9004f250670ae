//! Tests for the process-wide (per-thread) measurement API.
//!
//! Every test runs on its own thread, so each one starts with a fresh
//! tracker. Tests that check output pin their tracker's mode so they do not
//! depend on the process-wide setting.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use nestwatch::output::BufferReporter;
use nestwatch::{
    begin, collect, configure, depth, end, measure, measure_n, measure_repeated, try_end,
    ReportMode, TrackerError,
};

fn capture() -> BufferReporter {
    let buffer = BufferReporter::new();
    let handle = buffer.clone();
    configure(move |t| {
        t.set_mode(ReportMode::Verbose);
        t.set_reporter(handle);
    });
    buffer
}

fn silence() {
    configure(|t| t.set_mode(ReportMode::Silent));
}

// ============================================================================
// Stack discipline
// ============================================================================

#[test]
fn balanced_begin_end_returns_to_idle() {
    silence();
    begin("a");
    begin("b");
    begin(None);
    assert_eq!(depth(), 3);
    end();
    end();
    end();
    assert_eq!(depth(), 0);
}

#[test]
#[should_panic(expected = "Attempt to stop a measurement when none has been started")]
fn end_without_begin_panics() {
    silence();
    end();
}

#[test]
fn try_end_without_begin_is_an_error() {
    silence();
    assert_eq!(try_end(), Err(TrackerError::EmptyStack));
}

#[test]
fn elapsed_is_at_least_the_work() {
    silence();
    let took = measure("sleep", || std::thread::sleep(Duration::from_millis(5)));
    assert!(took >= Duration::from_millis(5), "took {:?}", took);
}

#[test]
fn sequential_sessions_are_independent() {
    let buffer = capture();

    measure("first", || {
        measure("child", || {});
    });
    assert_eq!(depth(), 0);
    buffer.clear();

    measure("second", || {
        measure("child", || {});
    });

    let lines = buffer.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Measuring second:");
    assert!(lines[1].starts_with("\tchild took: "));
    assert!(lines[2].starts_with("second took: "));
}

// ============================================================================
// Nesting output
// ============================================================================

#[test]
fn nested_output_order_and_indent() {
    let buffer = capture();

    begin("outer");
    begin("inner");
    end();
    end();

    let lines = buffer.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Measuring outer:");
    assert!(lines[1].starts_with("\tinner took: "), "{:?}", lines[1]);
    assert!(lines[1].ends_with("ms"));
    assert!(lines[2].starts_with("outer took: "), "{:?}", lines[2]);
}

#[test]
fn silent_mode_prints_nothing() {
    let buffer = BufferReporter::new();
    let handle = buffer.clone();
    configure(move |t| {
        t.set_mode(ReportMode::Silent);
        t.set_reporter(handle);
    });

    measure("outer", || {
        measure("inner", || {});
    });
    measure_n("repeat", 3, || {});

    assert!(buffer.is_empty());
}

// ============================================================================
// Panic safety
// ============================================================================

#[test]
fn panicking_block_keeps_stack_balanced() {
    silence();

    let result = catch_unwind(|| {
        measure("outer", || {
            measure("inner", || panic!("boom"));
        });
    });

    assert!(result.is_err());
    assert_eq!(depth(), 0);

    // The tracker is still usable afterwards.
    measure("after", || {});
    assert_eq!(depth(), 0);
}

#[test]
fn panicking_iteration_keeps_stack_balanced() {
    silence();
    let mut runs = 0;

    let result = catch_unwind(AssertUnwindSafe(|| {
        measure_n("flaky", 4, || {
            runs += 1;
            if runs == 2 {
                panic!("second iteration fails");
            }
        });
    }));

    assert!(result.is_err());
    assert_eq!(runs, 2);
    assert_eq!(depth(), 0);
}

// ============================================================================
// Repeated measurements
// ============================================================================

#[test]
fn repeated_noop_mean_is_small_and_non_negative() {
    silence();
    for n in [1, 2, 5, 25] {
        let mean = measure_n(None, n, || {});
        assert!(mean < Duration::from_millis(50), "n={} mean={:?}", n, mean);
    }
}

#[test]
#[should_panic(expected = "Iterations must be a positive integer")]
fn zero_iterations_panics() {
    silence();
    measure_n("never", 0, || {});
}

#[test]
fn repeated_runs_block_the_requested_number_of_times() {
    silence();
    let mut runs = 0;
    measure_n("count", 7, || runs += 1);
    assert_eq!(runs, 7);

    let mut runs = 0;
    measure_repeated("default", || runs += 1);
    assert_eq!(runs, 10);
}

#[test]
fn configured_iterations_apply_to_measure_repeated() {
    configure(|t| {
        *t = nestwatch::Tracker::with_config(nestwatch::Config::silent().iterations(3));
    });
    let mut runs = 0;
    measure_repeated(None, || runs += 1);
    assert_eq!(runs, 3);
}

#[test]
fn repeated_output_layout() {
    let buffer = capture();

    let result = collect("work", 3, || {});

    let lines = buffer.lines();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Measuring work");
    for (i, line) in lines[1..4].iter().enumerate() {
        assert!(
            line.starts_with(&format!("\tIteration {} took: ", i + 1)),
            "{:?}",
            line
        );
    }
    assert!(lines[4].starts_with("work Average "));
    assert!(lines[5].starts_with("work STD Dev. "));
    assert_eq!(result.samples.len(), 3);
}

#[test]
fn repeated_inside_measurement_indents_deeper() {
    let buffer = capture();

    measure("outer", || {
        measure_n("inner", 1, || {});
    });

    let lines = buffer.lines();
    assert_eq!(lines[0], "Measuring outer:");
    assert_eq!(lines[1], "\tMeasuring inner");
    assert!(lines[2].starts_with("\t\tIteration 1 took: "));
    assert!(lines[3].starts_with("\tinner Average "));
    assert!(lines[4].starts_with("\tinner STD Dev. "));
    assert!(lines[5].starts_with("outer took: "));
}
