//! # Aggregation Pipeline
//!
//! ```text
//! input ──> Batcher ──[bounded queue]──> Worker 0..N ──merge──> AggregateStore
//! ```
//!
//! One producer thread, a fixed pool of worker threads, and one shared store.
//! See [`PipelineCoordinator`] for lifecycle and completion rules.

pub mod coordinator;
pub mod input;
pub mod outcome;
pub mod state;
pub mod worker;

use std::io::Read;
use std::path::Path;

pub use coordinator::PipelineCoordinator;
pub use input::InputSource;
pub use outcome::{PipelineOutcome, RunReport};
pub use state::PipelineState;
pub use worker::{Worker, WorkerReport};

use crate::config::PipelineConfig;
use crate::error::Result;

/// Aggregate a measurements file with the given configuration
pub fn aggregate_file(path: impl AsRef<Path>, config: PipelineConfig) -> Result<PipelineOutcome> {
    PipelineCoordinator::new(config)?.run(InputSource::path(path))
}

/// Aggregate an arbitrary byte stream with the given configuration
pub fn aggregate_reader(
    reader: impl Read + Send + 'static,
    config: PipelineConfig,
) -> Result<PipelineOutcome> {
    PipelineCoordinator::new(config)?.run(InputSource::reader("reader", reader))
}
