#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Measurements Core
//!
//! Concurrent batch aggregation of `<station>;<value>` measurement files into
//! per-station minimum, mean and maximum.
//!
//! ## Architecture
//!
//! A single batcher thread reads the input and groups lines into batches,
//! which flow through a bounded queue to a fixed pool of workers. Each worker
//! aggregates into a private map and periodically merges it into one shared
//! store, so the per-record path never takes a lock.
//!
//! ## Module Organization
//!
//! - [`parser`] - Line to `(key, value)` record parsing
//! - [`batch`] - Batches and the batching producer
//! - [`aggregate`] - Worker-local maps, shared stores, the finalized result
//! - [`pipeline`] - Workers, run coordination and lifecycle state
//! - [`config`] - Pipeline tuning and layered configuration loading
//! - [`render`] - `{key=min/mean/max, ...}` output
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use measurements_core::{aggregate_file, format_aggregate, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = aggregate_file("measurements.txt", PipelineConfig::default())?;
//! if let Some(warning) = &outcome.warning {
//!     eprintln!("partial result: {warning}");
//! }
//! println!("{}", format_aggregate(&outcome.aggregate));
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod summary;

pub use aggregate::{AggregateMap, AggregateStore, LocalAggregate};
pub use batch::{Batch, Batcher};
pub use config::{ConfigLoader, ConfigOverrides, MergeStrategy, PipelineConfig};
pub use error::{AggregationError, ParseError, Result};
pub use parser::{parse_record, parse_record_bytes, Record};
pub use pipeline::{
    aggregate_file, aggregate_reader, InputSource, PipelineCoordinator, PipelineOutcome,
    PipelineState, RunReport,
};
pub use render::format_aggregate;
pub use summary::Summary;
