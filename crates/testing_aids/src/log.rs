// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// Log capture buffer for testing.
///
/// Uses `tracing_subscriber::fmt::MakeWriter` to capture formatted log output into a shared
/// buffer that can be inspected in tests. Install the subscriber for the scope of a test with
/// `tracing::subscriber::with_default()` or `set_default()`.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured log output as a string.
    #[must_use]
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).to_string()
    }

    /// Asserts that the captured log output contains the given string.
    ///
    /// # Panics
    ///
    /// Panics if the captured log output does not contain the expected string.
    pub fn assert_contains(&self, expected: &str) {
        let output = self.output();
        assert!(
            output.contains(expected),
            "log output does not contain '{expected}', got:\n{output}"
        );
    }

    /// Asserts that the captured log output does not contain the given string.
    ///
    /// # Panics
    ///
    /// Panics if the captured log output contains the string.
    pub fn assert_not_contains(&self, unexpected: &str) {
        let output = self.output();
        assert!(
            !output.contains(unexpected),
            "log output unexpectedly contains '{unexpected}', got:\n{output}"
        );
    }

    /// Creates a subscriber that writes events at INFO and above to this capture buffer.
    #[must_use]
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        self.subscriber_at(Level::INFO)
    }

    /// Creates a subscriber that writes events at `level` and above to this capture buffer.
    #[must_use]
    pub fn subscriber_at(&self, level: Level) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_filter(LevelFilter::from_level(level)),
        )
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Writer that appends to a shared buffer.
#[derive(Debug)]
pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
