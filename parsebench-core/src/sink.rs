//! Output Sinks
//!
//! Progress and report streams are append-only and flushed after every
//! write, so a run that aborts mid-way still leaves a readable partial
//! report behind. A sink is a cheap handle: clones write to the same stream.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared, line-flushed output stream
#[derive(Clone)]
pub struct OutputSink {
    label: Arc<str>,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputSink {
    /// Wrap an arbitrary writer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self::labeled("writer", writer)
    }

    fn labeled(label: &str, writer: impl Write + Send + 'static) -> Self {
        Self {
            label: Arc::from(label),
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Standard output
    pub fn stdout() -> Self {
        Self::labeled("stdout", io::stdout())
    }

    /// Standard error
    pub fn stderr() -> Self {
        Self::labeled("stderr", io::stderr())
    }

    /// Create (or truncate) a file
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self::labeled(&path.display().to_string(), file))
    }

    /// Open a file for appending, creating it if needed
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::labeled(&path.display().to_string(), file))
    }

    /// Write formatted text without a trailing newline, then flush
    pub fn write(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut w = self.lock();
        w.write_fmt(args)?;
        w.flush()
    }

    /// Write one line, then flush
    pub fn line(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut w = self.lock();
        w.write_fmt(args)?;
        w.write_all(b"\n")?;
        w.flush()
    }

    /// Whether both handles write to the same stream
    pub fn same_stream(&self, other: &OutputSink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        // A panic while holding the lock leaves only a partially written line.
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OutputSink").field(&self.label).finish()
    }
}

/// In-memory writer whose clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written text split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.lock().unwrap_or_else(|e| e.into_inner());
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
