// SPDX-License-Identifier: MIT
//
// Render sinks: where frames go.
//
// The engine never touches stderr directly. It builds a frame in an
// `OutputBuffer` and hands the bytes to a `RenderSink`, which also answers
// the one question layout needs from the terminal: how wide is it?
//
//   StderrSink: the real thing. Queries the width on every call, so a
//               resized terminal is picked up on the next frame.
//   MemorySink: a shared in-memory transcript with a fixed width. Clones
//               share the same buffer, so a test can keep one clone and
//               give the other to the engine.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::terminal;

/// Byte destination for rendered frames.
pub trait RenderSink: Write + Send {
    /// Current width in columns, or `None` when it cannot be determined
    /// (piped output, no controlling terminal).
    fn columns(&self) -> Option<u16>;
}

// ─── StderrSink ──────────────────────────────────────────────────────────────

/// Writes to the process's stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Write for StderrSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

impl RenderSink for StderrSink {
    fn columns(&self) -> Option<u16> {
        terminal::stderr_columns()
    }
}

// ─── MemorySink ──────────────────────────────────────────────────────────────

/// In-memory sink with a fixed width, for tests and for capturing frames.
#[derive(Debug, Clone)]
pub struct MemorySink {
    bytes: Arc<Mutex<Vec<u8>>>,
    columns: Option<u16>,
}

impl MemorySink {
    /// A sink that reports `columns` as its width.
    #[must_use]
    pub fn new(columns: Option<u16>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Vec::new())),
            columns,
        }
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Return everything written so far and clear the transcript.
    #[must_use]
    pub fn take(&self) -> String {
        let mut bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        let out = String::from_utf8_lossy(&bytes).into_owned();
        bytes.clear();
        out
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl RenderSink for MemorySink {
    fn columns(&self) -> Option<u16> {
        self.columns
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_clones_share_bytes() {
        let sink = MemorySink::new(Some(40));
        let mut writer = sink.clone();
        writer.write_all(b"abc").unwrap();
        assert_eq!(sink.contents(), "abc");
    }

    #[test]
    fn memory_sink_take_clears() {
        let mut sink = MemorySink::new(None);
        sink.write_all(b"one").unwrap();
        assert_eq!(sink.take(), "one");
        assert_eq!(sink.take(), "");
    }

    #[test]
    fn memory_sink_reports_width() {
        assert_eq!(MemorySink::new(Some(15)).columns(), Some(15));
        assert_eq!(MemorySink::new(None).columns(), None);
    }

    #[test]
    fn stderr_sink_columns_does_not_panic() {
        let _ = StderrSink.columns();
    }
}
