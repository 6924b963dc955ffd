//! Configuration Loader
//!
//! Layers built-in defaults, an optional configuration file,
//! `MEASUREMENTS_`-prefixed environment variables and explicit overrides
//! (command-line flags) into a validated [`PipelineConfig`]. Derived values
//! such as the queue depth are computed only after every layer is applied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::{derived_queue_depth, MergeStrategy, PipelineConfig};
use crate::constants::{default_worker_count, ENV_PREFIX};

/// Every field optional so that omitted keys fall back to defaults
#[derive(Debug, Default, Deserialize)]
struct PartialPipelineConfig {
    worker_count: Option<usize>,
    batch_size: Option<usize>,
    queue_depth: Option<usize>,
    read_buffer_size: Option<usize>,
    flush_interval_batches: Option<usize>,
    merge_strategy: Option<MergeStrategy>,
    log_malformed_records: Option<bool>,
}

/// Highest-priority settings, typically from command-line flags
///
/// `None` leaves the value from lower layers untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub worker_count: Option<usize>,
    pub batch_size: Option<usize>,
    pub queue_depth: Option<usize>,
    pub merge_strategy: Option<MergeStrategy>,
}

impl PartialPipelineConfig {
    fn apply(&mut self, overrides: &ConfigOverrides) {
        if overrides.worker_count.is_some() {
            self.worker_count = overrides.worker_count;
        }
        if overrides.batch_size.is_some() {
            self.batch_size = overrides.batch_size;
        }
        if overrides.queue_depth.is_some() {
            self.queue_depth = overrides.queue_depth;
        }
        if overrides.merge_strategy.is_some() {
            self.merge_strategy = overrides.merge_strategy;
        }
    }

    fn resolve(self) -> PipelineConfig {
        let worker_count = self.worker_count.unwrap_or_else(default_worker_count);
        let defaults = PipelineConfig::for_workers(worker_count);

        PipelineConfig {
            worker_count,
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            queue_depth: self
                .queue_depth
                .unwrap_or_else(|| derived_queue_depth(worker_count)),
            read_buffer_size: self.read_buffer_size.unwrap_or(defaults.read_buffer_size),
            flush_interval_batches: self
                .flush_interval_batches
                .unwrap_or(defaults.flush_interval_batches),
            merge_strategy: self.merge_strategy.unwrap_or(defaults.merge_strategy),
            log_malformed_records: self
                .log_malformed_records
                .unwrap_or(defaults.log_malformed_records),
        }
    }
}

/// Builder for layered configuration loading
#[derive(Debug)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_overrides: Option<HashMap<String, String>>,
    use_process_env: bool,
    overrides: ConfigOverrides,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that reads the process environment and no file
    pub fn new() -> Self {
        Self {
            file: None,
            env_overrides: None,
            use_process_env: true,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Read a configuration file; format is inferred from its extension
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use an explicit variable map instead of the process environment
    ///
    /// Keys carry the full `MEASUREMENTS_` prefix, as they would in the
    /// environment. Useful in tests that must not touch global state.
    pub fn with_env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self.use_process_env = true;
        self
    }

    /// Skip environment variables entirely
    pub fn without_env(mut self) -> Self {
        self.use_process_env = false;
        self.env_overrides = None;
        self
    }

    /// Apply `overrides` on top of the file and environment layers
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn load(self) -> ConfigResult<PipelineConfig> {
        let mut builder = config::Config::builder();

        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigurationError::FileNotFound(path.clone()));
            }
            debug!("CONFIG: Loading pipeline configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        if self.use_process_env {
            let environment = config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(self.env_overrides);
            builder = builder.add_source(environment);
        }

        let settings = builder.build().map_err(ConfigurationError::Build)?;
        let mut partial: PartialPipelineConfig = settings
            .try_deserialize()
            .map_err(ConfigurationError::Deserialization)?;
        partial.apply(&self.overrides);

        let config = partial.resolve();
        config.validate()?;

        debug!(
            worker_count = config.worker_count,
            batch_size = config.batch_size,
            queue_depth = config.queue_depth,
            merge_strategy = %config.merge_strategy,
            "CONFIG: Pipeline configuration resolved"
        );

        Ok(config)
    }
}
