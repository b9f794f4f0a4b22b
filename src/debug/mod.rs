//! Developer diagnostic logging
//!
//! [`DebugLog`] is the entry point for diagnostic text. It is handed a
//! [`DiagnosticSink`] explicitly; the usual sink is a [`CompositeSink`] that
//! fans out to the toolkit channel and, when one exists, the host console.

pub mod sink;
pub mod stack;

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ServerError;

pub use sink::{CompositeSink, ConsoleSink, DiagnosticSink, MemorySink, ToolkitSink};

/// Writes developer diagnostics to a sink.
#[derive(Clone)]
pub struct DebugLog {
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for DebugLog {
    /// Toolkit channel plus a console on standard error.
    fn default() -> Self {
        Self::new(
            CompositeSink::new()
                .with_sink(ToolkitSink::new())
                .with_sink(ConsoleSink::stderr()),
        )
    }
}

impl DebugLog {
    /// Creates a logger writing to `sink`.
    pub fn new(sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Appends `message` to every channel of the sink.
    pub fn log(&self, message: &str) {
        self.sink.log(message);
    }

    /// Logs the technical rendering of a server error.
    pub fn log_error(&self, error: &dyn ServerError) {
        self.log(&error.display_string());
    }

    /// Logs `label=value` and returns `value` unchanged.
    pub fn print_value<T: Display>(&self, label: &str, value: T) -> T {
        self.log(&format!("{}={}", label, value));
        value
    }

    /// Logs the current call stack under `label`, one frame per line.
    pub fn print_stack_trace(&self, label: &str) {
        let frames = stack::capture_frames();
        self.log(&stack::format_stack_trace(label, &frames));
    }

    /// Same as [`DebugLog::log`], for messages that must not ship.
    ///
    /// Keeping these separate lets every call be found and removed before a
    /// release.
    pub fn devlog(&self, label: &str) {
        self.sink.devlog(label);
    }

    /// Same as [`DebugLog::devlog`], returning `passthrough` unchanged.
    pub fn devlog_value<T>(&self, label: &str, passthrough: T) -> T {
        self.devlog(label);
        passthrough
    }

    /// Logs `value` as compact JSON.
    pub fn dump<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.log(&json),
            Err(err) => self.log(&format!("<unserializable value: {}>", err)),
        }
    }
}

impl std::fmt::Debug for DebugLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugLog").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{classify, RawTransportError, UnderlyingError};
    use std::collections::BTreeMap;

    fn memory_log() -> (DebugLog, MemorySink) {
        let sink = MemorySink::new();
        (DebugLog::new(sink.clone()), sink)
    }

    #[test]
    fn test_log_records_message() {
        let (log, sink) = memory_log();
        log.log("session started");
        assert_eq!(sink.entries(), vec!["session started"]);
    }

    #[test]
    fn test_log_with_and_without_console() {
        let with_console = DebugLog::new(
            CompositeSink::new()
                .with_sink(ToolkitSink::new())
                .with_sink(ConsoleSink::new(std::io::sink())),
        );
        let without_console = DebugLog::new(
            CompositeSink::new()
                .with_sink(ToolkitSink::new())
                .with_sink(ConsoleSink::absent()),
        );

        with_console.log("visible");
        without_console.log("only toolkit");
    }

    #[test]
    fn test_log_error_uses_display_string() {
        let (log, sink) = memory_log();
        let error = classify(
            &RawTransportError::new(12, "RPC failed")
                .with_underlying(UnderlyingError::new(1, "r-error", "object not found")),
        );

        log.log_error(&error);

        assert_eq!(
            sink.last().as_deref(),
            Some("5: RPC failed\nr-error 1: object not found")
        );
    }

    #[test]
    fn test_print_value_passes_through() {
        let (log, sink) = memory_log();
        let value = log.print_value("retries", 3);
        assert_eq!(value, 3);
        assert_eq!(sink.last().as_deref(), Some("retries=3"));
    }

    #[test]
    fn test_print_stack_trace_format() {
        let (log, sink) = memory_log();
        log.print_stack_trace("checkpoint");

        let output = sink.last().unwrap();
        assert!(output.starts_with("checkpoint\n"));
        for line in output.lines().skip(1) {
            assert!(line.starts_with("\tat "), "{line:?}");
        }
    }

    #[test]
    fn test_devlog_and_passthrough() {
        let (log, sink) = memory_log();
        log.devlog("temp");
        let kept = log.devlog_value("about to return", vec![1, 2]);

        assert_eq!(kept, vec![1, 2]);
        assert_eq!(sink.entries(), vec!["temp", "about to return"]);
    }

    #[test]
    fn test_dump_serializes_compact_json() {
        let (log, sink) = memory_log();
        let mut map = BTreeMap::new();
        map.insert("pane", "console");
        map.insert("state", "busy");

        log.dump(&map);

        assert_eq!(
            sink.last().as_deref(),
            Some(r#"{"pane":"console","state":"busy"}"#)
        );
    }

    #[test]
    fn test_dump_reports_serialization_failure() {
        let (log, sink) = memory_log();
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "non-string key");

        log.dump(&map);

        assert!(sink.last().unwrap().starts_with("<unserializable value:"));
    }

    #[test]
    fn test_clones_share_sink() {
        let (log, sink) = memory_log();
        let other = log.clone();
        log.log("a");
        other.log("b");
        assert_eq!(sink.entries(), vec!["a", "b"]);
    }
}
