//! JSON serialization for events and results.

use std::io::Write;

use serde::Serialize;

use super::{Event, Reporter};

/// Serialize a value to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for crate types).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serialize a value to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for crate types).
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Writes one JSON object per event, newline-delimited.
#[derive(Debug)]
pub struct JsonLinesReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesReporter<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesReporter<std::io::Stdout> {
    /// Reporter writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Reporter for JsonLinesReporter<W> {
    fn report(&mut self, event: &Event) {
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            tracing::warn!("failed to write measurement event: {}", err);
        }
    }
}
