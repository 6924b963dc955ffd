//! # Pipeline Configuration
//!
//! Tuning knobs for one aggregation run: how many workers, how large a batch,
//! how deep the batch queue, and how workers publish into the shared map.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use measurements_core::config::{ConfigLoader, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults sized to the host
//! let config = PipelineConfig::default();
//!
//! // Layered: defaults -> file -> MEASUREMENTS_* environment variables
//! let config = ConfigLoader::new().with_file("measurements.toml").load()?;
//! println!("workers: {}", config.worker_count);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    default_worker_count, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL_BATCHES,
    DEFAULT_READ_BUFFER_SIZE, QUEUE_DEPTH_PER_WORKER,
};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::{ConfigLoader, ConfigOverrides};

/// How worker-local maps are merged into the shared aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Concurrent sharded map, per-key entry locking
    #[default]
    Sharded,
    /// Single mutex around the whole map
    Locked,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sharded => write!(f, "sharded"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sharded" => Ok(Self::Sharded),
            "locked" => Ok(Self::Locked),
            other => Err(ConfigurationError::invalid_value(
                "merge_strategy",
                other,
                "expected 'sharded' or 'locked'",
            )),
        }
    }
}

/// Configuration for a single pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of aggregation workers
    pub worker_count: usize,
    /// Maximum lines per batch
    pub batch_size: usize,
    /// Capacity of the bounded batch queue
    pub queue_depth: usize,
    /// Capacity of the buffered reader over the input
    pub read_buffer_size: usize,
    /// Batches a worker folds locally before merging into the shared map
    pub flush_interval_batches: usize,
    /// Global merge strategy
    pub merge_strategy: MergeStrategy,
    /// Emit a debug event for every rejected line
    pub log_malformed_records: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_workers(default_worker_count())
    }
}

impl PipelineConfig {
    /// Defaults for an explicit worker count, with the queue depth derived from it
    pub fn for_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            batch_size: DEFAULT_BATCH_SIZE,
            queue_depth: derived_queue_depth(worker_count),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            flush_interval_batches: DEFAULT_FLUSH_INTERVAL_BATCHES,
            merge_strategy: MergeStrategy::default(),
            log_malformed_records: true,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    pub fn with_flush_interval_batches(mut self, flush_interval_batches: usize) -> Self {
        self.flush_interval_batches = flush_interval_batches;
        self
    }

    pub fn with_merge_strategy(mut self, merge_strategy: MergeStrategy) -> Self {
        self.merge_strategy = merge_strategy;
        self
    }

    pub fn with_malformed_logging(mut self, enabled: bool) -> Self {
        self.log_malformed_records = enabled;
        self
    }

    /// Reject values that would stall or starve the pipeline
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("worker_count", self.worker_count),
            ("batch_size", self.batch_size),
            ("queue_depth", self.queue_depth),
            ("read_buffer_size", self.read_buffer_size),
            ("flush_interval_batches", self.flush_interval_batches),
        ];

        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value,
                    "must be greater than zero",
                ));
            }
        }

        Ok(())
    }

    /// Upper bound on lines held in the queue at once
    pub fn max_buffered_lines(&self) -> usize {
        self.queue_depth.saturating_mul(self.batch_size)
    }
}

pub(crate) fn derived_queue_depth(worker_count: usize) -> usize {
    worker_count.max(1).saturating_mul(QUEUE_DEPTH_PER_WORKER)
}
