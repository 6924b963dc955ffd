//! # System Constants
//!
//! Input format and tuning defaults that define the operational boundaries of
//! the aggregation pipeline.

/// Field separator between station name and measurement
pub const DELIMITER: char = ';';

/// Default number of lines grouped into one unit of work
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Queue depth per worker when `queue_depth` is not configured
pub const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Default capacity of the buffered reader over the input
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Default number of batches a worker folds before flushing to the global map
pub const DEFAULT_FLUSH_INTERVAL_BATCHES: usize = 1;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MEASUREMENTS";

/// Environment variable naming the runtime environment
pub const ENV_NAME_VAR: &str = "MEASUREMENTS_ENV";

/// Environment variable selecting the log output format (`json` or `pretty`)
pub const LOG_FORMAT_VAR: &str = "MEASUREMENTS_LOG_FORMAT";

/// Available parallelism of the host, or 1 when it cannot be determined
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
