//! # Aggregation Worker
//!
//! Each worker takes batches from the shared queue on a first-available
//! basis, folds them into its private [`LocalAggregate`] and periodically
//! flushes that map into the shared store. The loop ends when the queue is
//! both closed and drained; a final flush publishes whatever is left.

use std::sync::Arc;

use crossbeam::channel::Receiver;
use serde::Serialize;
use tracing::{debug, trace};

use crate::aggregate::{AggregateStore, FoldStats, LocalAggregate};
use crate::batch::Batch;

/// Per-worker counters, reported once the worker has finished
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub batches_processed: u64,
    pub records_aggregated: u64,
    pub malformed_records: u64,
    pub flushes: u64,
}

pub struct Worker {
    id: usize,
    receiver: Receiver<Batch>,
    store: Arc<dyn AggregateStore>,
    flush_interval_batches: usize,
    log_malformed: bool,
}

impl Worker {
    pub fn new(
        id: usize,
        receiver: Receiver<Batch>,
        store: Arc<dyn AggregateStore>,
        flush_interval_batches: usize,
        log_malformed: bool,
    ) -> Self {
        Self {
            id,
            receiver,
            store,
            flush_interval_batches: flush_interval_batches.max(1),
            log_malformed,
        }
    }

    /// Consume batches until the queue is closed and empty
    pub fn run(self) -> WorkerReport {
        let mut local = LocalAggregate::new();
        let mut stats = FoldStats::default();
        let mut report = WorkerReport {
            worker_id: self.id,
            ..Default::default()
        };
        let mut since_flush = 0;

        for batch in self.receiver.iter() {
            stats.absorb(local.fold_batch(&batch, self.log_malformed));
            report.batches_processed += 1;
            since_flush += 1;
            trace!(worker_id = self.id, sequence = batch.sequence(), "WORKER: Batch folded");
            drop(batch);

            if since_flush >= self.flush_interval_batches {
                self.flush(&mut local, &mut report);
                since_flush = 0;
            }
        }

        if !local.is_empty() {
            self.flush(&mut local, &mut report);
        }

        report.records_aggregated = stats.records;
        report.malformed_records = stats.malformed;

        debug!(
            worker_id = self.id,
            batches = report.batches_processed,
            records = report.records_aggregated,
            malformed = report.malformed_records,
            flushes = report.flushes,
            "WORKER: Queue drained, exiting"
        );

        report
    }

    fn flush(&self, local: &mut LocalAggregate, report: &mut WorkerReport) {
        let keys = self.store.merge_local(local);
        report.flushes += 1;
        trace!(worker_id = self.id, keys, "MERGE: Local aggregate flushed");
    }
}
