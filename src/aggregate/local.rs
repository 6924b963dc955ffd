//! Worker-private aggregation

use std::collections::hash_map::{self, HashMap};

use tracing::debug;

use crate::batch::Batch;
use crate::parser::parse_record_bytes;
use crate::summary::Summary;

/// Counters from folding one or more batches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    pub records: u64,
    pub malformed: u64,
}

impl FoldStats {
    pub fn absorb(&mut self, other: FoldStats) {
        self.records += other.records;
        self.malformed += other.malformed;
    }
}

/// Key to summary map owned by exactly one worker
///
/// Never shared: a worker folds batches into it, then drains it into the
/// shared store. Draining keeps the allocated capacity for the next round.
#[derive(Debug, Default)]
pub struct LocalAggregate {
    entries: HashMap<String, Summary>,
}

impl LocalAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn fold_record(&mut self, key: &str, value: f64) {
        match self.entries.get_mut(key) {
            Some(summary) => summary.observe(value),
            None => {
                self.entries.insert(key.to_owned(), Summary::from_value(value));
            }
        }
    }

    /// Parse and fold every line of `batch`, skipping malformed lines
    pub fn fold_batch(&mut self, batch: &Batch, log_malformed: bool) -> FoldStats {
        let mut stats = FoldStats::default();

        for line in batch.lines() {
            match parse_record_bytes(line) {
                Ok(record) => {
                    self.fold_record(record.key, record.value);
                    stats.records += 1;
                }
                Err(e) => {
                    stats.malformed += 1;
                    if log_malformed {
                        debug!(
                            batch = batch.sequence(),
                            line = %String::from_utf8_lossy(line),
                            error = %e,
                            "WORKER: Skipping malformed record"
                        );
                    }
                }
            }
        }

        stats
    }

    pub fn get(&self, key: &str) -> Option<&Summary> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and yield every entry, leaving the map empty
    pub fn drain(&mut self) -> hash_map::Drain<'_, String, Summary> {
        self.entries.drain()
    }
}

impl FromIterator<(String, Summary)> for LocalAggregate {
    fn from_iter<I: IntoIterator<Item = (String, Summary)>>(iter: I) -> Self {
        let mut local = LocalAggregate::new();
        for (key, summary) in iter {
            local
                .entries
                .entry(key)
                .and_modify(|existing| existing.merge(&summary))
                .or_insert(summary);
        }
        local
    }
}
