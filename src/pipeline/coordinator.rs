//! # Pipeline Coordinator
//!
//! Wires the batcher, the bounded batch queue and the worker pool together
//! and owns the shared store for the duration of one run.
//!
//! ## Completion
//!
//! All threads are scoped to [`PipelineCoordinator::run`]. The batcher drops
//! its sender when input ends, which closes the queue; workers exit once the
//! queue is closed and drained, after their final flush. `run` joins the
//! batcher (entering `Draining`), then every worker, and only then freezes the
//! store into the returned aggregate (`Completed`).

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::Utc;
use crossbeam::channel::bounded;
use parking_lot::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::input::InputSource;
use super::outcome::{PipelineOutcome, RunReport};
use super::state::PipelineState;
use super::worker::{Worker, WorkerReport};
use crate::aggregate::new_store;
use crate::batch::{Batch, Batcher, BatcherReport};
use crate::config::PipelineConfig;
use crate::error::{AggregationError, Result};

/// Runs one aggregation over one input source
///
/// A coordinator is single-use: after `Completed` or `Failed` a further
/// `run` is rejected as an invalid state transition.
#[derive(Debug)]
pub struct PipelineCoordinator {
    run_id: Uuid,
    config: PipelineConfig,
    state: RwLock<PipelineState>,
}

impl PipelineCoordinator {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            run_id: Uuid::new_v4(),
            config,
            state: RwLock::new(PipelineState::Idle),
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        *self.state.read()
    }

    fn transition(&self, next: PipelineState) -> Result<()> {
        let mut state = self.state.write();
        let from = *state;
        if !from.can_transition_to(next) {
            return Err(AggregationError::InvalidStateTransition { from, to: next });
        }

        info!(run_id = %self.run_id, %from, to = %next, "PIPELINE: State transition");
        *state = next;
        Ok(())
    }

    /// Aggregate `source` to completion
    ///
    /// Returns `Err(InputUnavailable)` when the source cannot be opened. A
    /// mid-stream read failure still yields an outcome, carrying the
    /// failure as its warning.
    #[instrument(skip(self, source), fields(run_id = %self.run_id, source = %source.describe()))]
    pub fn run(&self, source: InputSource) -> Result<PipelineOutcome> {
        let current = self.state();
        if current != PipelineState::Idle {
            return Err(AggregationError::InvalidStateTransition {
                from: current,
                to: PipelineState::Running,
            });
        }

        let source_name = source.describe();
        let reader = match source.open(self.config.read_buffer_size) {
            Ok(reader) => reader,
            Err(e) => {
                error!(error = %e, "❌ PIPELINE: Input unavailable, no batches produced");
                self.transition(PipelineState::Failed)?;
                return Err(e);
            }
        };

        let started_at = Utc::now();
        let started = Instant::now();
        self.transition(PipelineState::Running)?;

        info!(
            workers = self.config.worker_count,
            batch_size = self.config.batch_size,
            queue_depth = self.config.queue_depth,
            merge_strategy = %self.config.merge_strategy,
            "🚀 PIPELINE: Starting aggregation run"
        );

        let store = new_store(self.config.merge_strategy);
        let (sender, receiver) = bounded::<Batch>(self.config.queue_depth);
        let batcher = Batcher::new(self.config.batch_size);

        let (batcher_report, worker_results) = thread::scope(|s| {
            let batcher_handle = s.spawn(move || batcher.run(reader, sender));

            let worker_handles: Vec<_> = (0..self.config.worker_count)
                .map(|worker_id| {
                    let worker = Worker::new(
                        worker_id,
                        receiver.clone(),
                        Arc::clone(&store),
                        self.config.flush_interval_batches,
                        self.config.log_malformed_records,
                    );
                    s.spawn(move || worker.run())
                })
                .collect();
            drop(receiver);

            let batcher_report = batcher_handle.join();
            if let Err(e) = self.transition(PipelineState::Draining) {
                warn!(error = %e, "PIPELINE: Unexpected state while draining");
            }

            let worker_results: Vec<_> = worker_handles
                .into_iter()
                .enumerate()
                .map(|(worker_id, handle)| {
                    handle
                        .join()
                        .map_err(|_| AggregationError::WorkerPanicked { worker_id })
                })
                .collect();

            (batcher_report, worker_results)
        });

        let batcher_report: BatcherReport = batcher_report.map_err(|_| {
            error!("❌ PIPELINE: Batcher thread panicked");
            AggregationError::BatcherPanicked
        })?;

        let workers = worker_results
            .into_iter()
            .collect::<Result<Vec<WorkerReport>>>()
            .inspect_err(|e| error!(error = %e, "❌ PIPELINE: Worker failed, aggregate discarded"))?;

        self.transition(PipelineState::Completed)?;

        let aggregate = store.snapshot();
        let report = RunReport {
            run_id: self.run_id,
            source: source_name,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            merge_strategy: self.config.merge_strategy,
            batches: batcher_report.batches_emitted,
            lines_read: batcher_report.lines_read,
            records_aggregated: workers.iter().map(|w| w.records_aggregated).sum(),
            malformed_records: workers.iter().map(|w| w.malformed_records).sum(),
            distinct_keys: aggregate.len(),
            workers,
        };

        let warning = batcher_report
            .read_error
            .map(|source| AggregationError::InputReadFailure {
                lines_read: batcher_report.lines_read,
                source,
            });

        if let Some(warning) = &warning {
            warn!(error = %warning, "⚠️ PIPELINE: Returning partial aggregate");
        }

        info!(
            lines = report.lines_read,
            records = report.records_aggregated,
            malformed = report.malformed_records,
            keys = report.distinct_keys,
            elapsed_ms = report.elapsed_ms,
            "✅ PIPELINE: Aggregation run completed"
        );

        Ok(PipelineOutcome {
            aggregate,
            report,
            warning,
        })
    }
}
