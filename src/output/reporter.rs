//! Reporter implementations.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{format_event, format_event_colored, Event};

/// Sink for tracker events.
///
/// Only called when the tracker's reporting mode is verbose.
pub trait Reporter {
    /// Handle one event.
    fn report(&mut self, event: &Event);
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, event: &Event) {
        (**self).report(event)
    }
}

/// Prints events as text lines on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter {
    color: bool,
}

impl TerminalReporter {
    /// Plain-text reporter.
    pub fn new() -> Self {
        Self { color: false }
    }

    /// Reporter that colours names and durations.
    pub fn colored() -> Self {
        Self { color: true }
    }
}

impl Reporter for TerminalReporter {
    fn report(&mut self, event: &Event) {
        let lines = if self.color {
            format_event_colored(event)
        } else {
            format_event(event)
        };
        for line in lines {
            println!("{}", line);
        }
    }
}

/// Forwards formatted lines to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &Event) {
        for line in format_event(event) {
            tracing::info!(target: "nestwatch", "{}", line);
        }
    }
}

/// Captures events in a shared buffer.
///
/// Clones share the same buffer, so one handle can be given to a tracker
/// while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct BufferReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl BufferReporter {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        // A panic while holding the lock cannot leave a half-pushed event.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the captured events.
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Captured events formatted as plain text lines.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().flat_map(format_event).collect()
    }

    /// Drop all captured events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of captured events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no events have been captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Reporter for BufferReporter {
    fn report(&mut self, event: &Event) {
        self.lock().push(event.clone());
    }
}
