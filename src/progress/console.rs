//! Console sinks.
//!
//! Two implementations of the same interface: [`DirectConsole`] writes
//! through immediately, [`BufferedConsole`] holds text while a capture is
//! active and hands it to the render loop in the order it was written.

use super::lock;
use std::io::{self, Write};
use std::sync::Mutex;

/// Destination for all user-facing text.
///
/// `write_out` is the primary surface (results), `write_err` the
/// diagnostic surface (logs, warnings).
pub trait Console: Send + Sync {
    fn write_out(&self, text: &str);
    fn write_err(&self, text: &str);
}

/// Writes straight to the process stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectConsole;

impl Console for DirectConsole {
    fn write_out(&self, text: &str) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn write_err(&self, text: &str) {
        let _ = io::stderr().lock().write_all(text.as_bytes());
    }
}

#[derive(Default)]
struct Buffers {
    capturing: bool,
    out: String,
    err: String,
}

struct Sinks {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

/// A console that can divert writes into memory.
///
/// Lock order is buffers, then sinks.
pub struct BufferedConsole {
    buffers: Mutex<Buffers>,
    sinks: Mutex<Sinks>,
}

impl BufferedConsole {
    /// Console over the process stdout/stderr.
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Console over arbitrary real sinks.
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            buffers: Mutex::new(Buffers::default()),
            sinks: Mutex::new(Sinks { out, err }),
        }
    }

    /// Start holding writes in memory.
    pub fn begin_capture(&self) {
        lock(&self.buffers).capturing = true;
    }

    /// Stop capturing and write out whatever is still held.
    ///
    /// The buffer lock is held until the leftovers are written, so no
    /// direct write can overtake them.
    pub fn end_capture(&self) {
        let mut buffers = lock(&self.buffers);
        buffers.capturing = false;
        let out = std::mem::take(&mut buffers.out);
        let err = std::mem::take(&mut buffers.err);
        self.write_through(&out, &err);
    }

    pub fn is_capturing(&self) -> bool {
        lock(&self.buffers).capturing
    }

    /// Take the captured text, or `None` if both buffers are empty.
    pub fn take_captured(&self) -> Option<(String, String)> {
        let mut buffers = lock(&self.buffers);
        if buffers.out.is_empty() && buffers.err.is_empty() {
            return None;
        }
        Some((
            std::mem::take(&mut buffers.out),
            std::mem::take(&mut buffers.err),
        ))
    }

    /// Write to the real sinks, bypassing capture.
    pub fn write_through(&self, out: &str, err: &str) {
        let mut sinks = lock(&self.sinks);
        if !out.is_empty() {
            let _ = sinks.out.write_all(out.as_bytes());
            let _ = sinks.out.flush();
        }
        if !err.is_empty() {
            let _ = sinks.err.write_all(err.as_bytes());
            let _ = sinks.err.flush();
        }
    }
}

impl Console for BufferedConsole {
    fn write_out(&self, text: &str) {
        let mut buffers = lock(&self.buffers);
        if buffers.capturing {
            buffers.out.push_str(text);
        } else {
            self.write_through(text, "");
        }
    }

    fn write_err(&self, text: &str) {
        let mut buffers = lock(&self.buffers);
        if buffers.capturing {
            buffers.err.push_str(text);
        } else {
            self.write_through("", text);
        }
    }
}
