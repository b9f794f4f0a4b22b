//! Diagnostic sinks
//!
//! A sink is a destination for developer diagnostic text. Writing to a sink
//! never fails: I/O errors on the console channel are swallowed.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// A destination for diagnostic text.
pub trait DiagnosticSink: Send + Sync {
    /// Appends a diagnostic message.
    fn log(&self, text: &str);

    /// Appends a short-lived developer message.
    fn devlog(&self, text: &str) {
        self.log(text);
    }
}

/// Recovers the guard of a poisoned lock; diagnostics must keep flowing.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The toolkit diagnostic channel, backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolkitSink;

impl ToolkitSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for ToolkitSink {
    fn log(&self, text: &str) {
        tracing::info!(target: "rpcdiag::diagnostics", "{}", text);
    }

    fn devlog(&self, text: &str) {
        tracing::info!(target: "rpcdiag::devlog", "{}", text);
    }
}

/// The host console channel.
///
/// A console may be absent, in which case every write is a no-op.
pub struct ConsoleSink {
    writer: Option<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleSink {
    /// Creates a console over an arbitrary writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Some(Mutex::new(Box::new(writer))),
        }
    }

    /// A console writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// A console writing to standard error.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// A console that is not present in the host.
    pub fn absent() -> Self {
        Self { writer: None }
    }

    /// Returns true if a console channel is present.
    pub fn is_present(&self) -> bool {
        self.writer.is_some()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("present", &self.is_present())
            .finish()
    }
}

impl DiagnosticSink for ConsoleSink {
    fn log(&self, text: &str) {
        let Some(writer) = &self.writer else {
            return;
        };
        let mut writer = lock(writer);
        let _ = writeln!(writer, "{}", text);
        let _ = writer.flush();
    }
}

/// Fans every message out to a list of sinks, in order.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn DiagnosticSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink to the fan-out.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Returns the number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DiagnosticSink for CompositeSink {
    fn log(&self, text: &str) {
        for sink in &self.sinks {
            sink.log(text);
        }
    }

    fn devlog(&self, text: &str) {
        for sink in &self.sinks {
            sink.devlog(text);
        }
    }
}

/// An in-memory sink that records every message.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded messages.
    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }

    /// Returns the most recent message.
    pub fn last(&self) -> Option<String> {
        lock(&self.entries).last().cloned()
    }
}

impl DiagnosticSink for MemorySink {
    fn log(&self, text: &str) {
        lock(&self.entries).push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A writer whose contents can be read back after the sink takes it.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(lock(&self.0).clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            lock(&self.0).extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_console_sink_writes_line() {
        let buffer = SharedBuffer::default();
        let console = ConsoleSink::new(buffer.clone());

        console.log("first");
        console.log("second");

        assert!(console.is_present());
        assert_eq!(buffer.contents(), "first\nsecond\n");
    }

    #[test]
    fn test_absent_console_is_silent() {
        let console = ConsoleSink::absent();
        assert!(!console.is_present());
        console.log("dropped");
        console.devlog("dropped too");
    }

    #[test]
    fn test_console_ignores_write_errors() {
        let console = ConsoleSink::new(BrokenWriter);
        console.log("cannot be written");
    }

    #[test]
    fn test_composite_fans_out_in_order() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let composite = CompositeSink::new()
            .with_sink(a.clone())
            .with_sink(b.clone());

        composite.log("hello");
        composite.devlog("temp");

        assert_eq!(composite.len(), 2);
        assert_eq!(a.entries(), vec!["hello", "temp"]);
        assert_eq!(b.entries(), vec!["hello", "temp"]);
    }

    #[test]
    fn test_empty_composite() {
        let composite = CompositeSink::new();
        assert!(composite.is_empty());
        composite.log("nowhere");
    }

    #[test]
    fn test_toolkit_sink_without_subscriber() {
        let toolkit = ToolkitSink::new();
        toolkit.log("no subscriber installed");
        toolkit.devlog("still fine");
    }

    #[test]
    fn test_memory_sink_last() {
        let sink = MemorySink::new();
        assert!(sink.last().is_none());
        sink.log("one");
        sink.log("two");
        assert_eq!(sink.last().as_deref(), Some("two"));
    }
}
