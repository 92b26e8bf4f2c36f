//! Scanner module - detection and scan orchestration.
//!
//! The [`ScanEngine`] pulls targets from a [`Catalog`], runs a [`Detector`]
//! on each one under a fixed concurrency ceiling, and hands every outcome
//! to an [`OutcomeHandler`].

pub mod http;
pub mod traits;

use crate::catalog::Catalog;
use crate::error::InputResult;
use crate::progress::Progress;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

pub use http::{DetectorConfig, HttpDetector};
pub use traits::{Classification, Detector, OutcomeHandler, ScanOutcome, Scheme};

/// Default number of probes in flight.
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Aggregate counts for a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub dispatched: u64,
    pub encrypted: u64,
    pub plaintext: u64,
    pub unreachable: u64,
    /// Tasks that panicked before producing an outcome.
    pub failed: u64,
}

impl ScanSummary {
    /// Targets whose task has joined.
    pub fn completed(&self) -> u64 {
        self.encrypted + self.plaintext + self.unreachable + self.failed
    }

    fn record(&mut self, joined: Result<Classification, JoinError>) {
        match joined {
            Ok(Classification::Encrypted) => self.encrypted += 1,
            Ok(Classification::Plaintext) => self.plaintext += 1,
            Ok(Classification::Unreachable) => self.unreachable += 1,
            Err(e) => {
                error!("scan task failed: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Runs detectors over a catalog with bounded concurrency.
pub struct ScanEngine<D> {
    detector: Arc<D>,
    progress: Arc<dyn Progress>,
    concurrency: usize,
}

impl<D: Detector + 'static> ScanEngine<D> {
    /// Create an engine. A concurrency of zero is treated as one.
    pub fn new(detector: D, progress: Arc<dyn Progress>, concurrency: usize) -> Self {
        Self {
            detector: Arc::new(detector),
            progress,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scan every target the catalog yields.
    ///
    /// Dispatch waits for a free slot, so at most `concurrency` probes run
    /// at once. This only returns after every dispatched probe has finished,
    /// including when the catalog fails part-way; that read error is
    /// returned after the barrier.
    pub async fn run<H>(&self, catalog: &mut Catalog, handler: Arc<H>) -> InputResult<ScanSummary>
    where
        H: OutcomeHandler + 'static,
    {
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut summary = ScanSummary::default();
        let count_known = catalog.count_known();

        let enumeration = loop {
            let target = match catalog.next().await {
                Ok(Some(target)) => target,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            let Ok(permit) = Arc::clone(&gate).acquire_owned().await else {
                break Ok(());
            };

            if !count_known {
                self.progress.add_to_total(1);
            }
            summary.dispatched += 1;

            let detector = Arc::clone(&self.detector);
            let progress = Arc::clone(&self.progress);
            let handler = Arc::clone(&handler);
            tasks.spawn(async move {
                let outcome = detector.detect(target).await;
                drop(permit);
                progress.increment();

                let classification = outcome.classification;
                handler.handle(outcome);
                classification
            });

            // Reap finished tasks so the set does not grow with the input.
            while let Some(joined) = tasks.try_join_next() {
                self.reap(&mut summary, joined);
            }
        };

        while let Some(joined) = tasks.join_next().await {
            self.reap(&mut summary, joined);
        }

        // A target counts once it is dispatched; make the total agree.
        if catalog.total() != Some(summary.dispatched) {
            self.progress.set_total(summary.dispatched);
        }

        debug!(?summary, "scan barrier reached");
        enumeration.map(|()| summary)
    }

    /// A task that panicked never signalled progress; do it here.
    fn reap(&self, summary: &mut ScanSummary, joined: Result<Classification, JoinError>) {
        if joined.is_err() {
            self.progress.increment();
        }
        summary.record(joined);
    }
}
