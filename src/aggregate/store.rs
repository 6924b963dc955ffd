//! Shared aggregate stores
//!
//! Both implementations merge atomically per key. [`ShardedAggregateStore`]
//! only serializes merges that land in the same shard;
//! [`LockedAggregateStore`] serializes every merge but takes its lock once per
//! flushed local map.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::local::LocalAggregate;
use super::result::AggregateMap;
use crate::config::MergeStrategy;
use crate::summary::Summary;

/// Concurrency-safe key to summary map shared by all workers of a run
pub trait AggregateStore: Send + Sync {
    /// Merge one partial summary into the entry for `key`
    fn merge(&self, key: String, partial: Summary);

    /// Merge every entry of a worker-local map, leaving it empty
    ///
    /// Returns the number of keys merged.
    fn merge_local(&self, local: &mut LocalAggregate) -> usize {
        let mut merged = 0;
        for (key, partial) in local.drain() {
            self.merge(key, partial);
            merged += 1;
        }
        merged
    }

    /// Number of distinct keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the current contents into a sorted, read-only map
    fn snapshot(&self) -> AggregateMap;

    fn strategy(&self) -> MergeStrategy;
}

/// Store for the configured strategy
pub fn new_store(strategy: MergeStrategy) -> Arc<dyn AggregateStore> {
    match strategy {
        MergeStrategy::Sharded => Arc::new(ShardedAggregateStore::new()),
        MergeStrategy::Locked => Arc::new(LockedAggregateStore::new()),
    }
}

/// Sharded concurrent map; the shard lock is held only for one key update
#[derive(Debug, Default)]
pub struct ShardedAggregateStore {
    entries: DashMap<String, Summary>,
}

impl ShardedAggregateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AggregateStore for ShardedAggregateStore {
    fn merge(&self, key: String, partial: Summary) {
        self.entries
            .entry(key)
            .and_modify(|global| global.merge(&partial))
            .or_insert(partial);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> AggregateMap {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn strategy(&self) -> MergeStrategy {
        MergeStrategy::Sharded
    }
}

/// Whole-map mutex; adequate when key cardinality is small
#[derive(Debug, Default)]
pub struct LockedAggregateStore {
    entries: Mutex<HashMap<String, Summary>>,
}

impl LockedAggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn merge_into(entries: &mut HashMap<String, Summary>, key: String, partial: Summary) {
        entries
            .entry(key)
            .and_modify(|global| global.merge(&partial))
            .or_insert(partial);
    }
}

impl AggregateStore for LockedAggregateStore {
    fn merge(&self, key: String, partial: Summary) {
        Self::merge_into(&mut self.entries.lock(), key, partial);
    }

    fn merge_local(&self, local: &mut LocalAggregate) -> usize {
        let mut entries = self.entries.lock();
        let mut merged = 0;
        for (key, partial) in local.drain() {
            Self::merge_into(&mut entries, key, partial);
            merged += 1;
        }
        merged
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn snapshot(&self) -> AggregateMap {
        self.entries
            .lock()
            .iter()
            .map(|(key, summary)| (key.clone(), *summary))
            .collect()
    }

    fn strategy(&self) -> MergeStrategy {
        MergeStrategy::Locked
    }
}
