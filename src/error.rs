use std::io;

use crate::config::ConfigurationError;
use crate::pipeline::PipelineState;

/// Reasons a single input line is rejected by the record parser.
///
/// Every variant is a malformed record: the line is skipped and the run
/// continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed record: missing ';' delimiter")]
    MissingDelimiter,

    #[error("Malformed record: expected one ';' delimiter, found {count}")]
    ExtraDelimiter { count: usize },

    #[error("Malformed record: invalid numeric value '{value}'")]
    InvalidValue { value: String },

    #[error("Malformed record: non-finite value '{value}'")]
    NonFiniteValue { value: String },

    #[error("Malformed record: line is not valid UTF-8 at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Errors surfaced by a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error("Input unavailable: {source_name}: {source}")]
    InputUnavailable {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("Input read failure after {lines_read} lines: {source}")]
    InputReadFailure {
        lines_read: u64,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid pipeline state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: PipelineState,
        to: PipelineState,
    },

    #[error("Worker {worker_id} panicked")]
    WorkerPanicked { worker_id: usize },

    #[error("Batcher thread panicked")]
    BatcherPanicked,
}

impl AggregationError {
    /// Whether the run produced no usable aggregate
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InputReadFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, AggregationError>;
