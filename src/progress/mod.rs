//! Progress tracking and terminal output.
//!
//! Everything that prints goes through a [`Console`]. When the live
//! [`Multiplexer`] is active the console buffers writes and the render loop
//! flushes them around the progress bar; otherwise writes pass straight
//! through and progress calls are no-ops.

mod console;
mod live;
mod writer;

pub use console::{BufferedConsole, Console, DirectConsole};
pub use live::{Multiplexer, ProgressState, REFRESH_HZ};
pub use writer::ConsoleWriter;

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Progress tracking as seen by the scan engine.
#[async_trait]
pub trait Progress: Send + Sync {
    /// Begin tracking. `None` means the total is not known up front.
    fn start(&self, total: Option<u64>);

    /// Grow the total, e.g. once per dispatch on streamed input.
    fn add_to_total(&self, delta: u64);

    /// Replace the total with an authoritative value.
    fn set_total(&self, total: u64);

    /// Record one finished target.
    fn increment(&self);

    /// Stop rendering, flush anything captured and draw the final state.
    async fn finish(&self);
}

/// Progress tracking for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

#[async_trait]
impl Progress for NoopProgress {
    fn start(&self, _total: Option<u64>) {}
    fn add_to_total(&self, _delta: u64) {}
    fn set_total(&self, _total: u64) {}
    fn increment(&self) {}
    async fn finish(&self) {}
}

/// Lock a mutex, recovering the data if a writer panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
