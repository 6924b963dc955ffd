use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::worker::WorkerReport;
use crate::aggregate::AggregateMap;
use crate::config::MergeStrategy;
use crate::error::AggregationError;

/// Run statistics, serializable for `--json-report` style output
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub merge_strategy: MergeStrategy,
    pub batches: u64,
    pub lines_read: u64,
    pub records_aggregated: u64,
    pub malformed_records: u64,
    pub distinct_keys: usize,
    pub workers: Vec<WorkerReport>,
}

/// Result of a run that produced an aggregate
///
/// `warning` is set when the input failed mid-stream: the aggregate then
/// covers every line read before the failure.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub aggregate: AggregateMap,
    pub report: RunReport,
    pub warning: Option<AggregationError>,
}

impl PipelineOutcome {
    pub fn is_partial(&self) -> bool {
        self.warning.is_some()
    }

    /// Treat a truncated input as an error, discarding the partial aggregate
    pub fn into_complete(self) -> Result<AggregateMap, AggregationError> {
        match self.warning {
            Some(warning) => Err(warning),
            None => Ok(self.aggregate),
        }
    }
}
