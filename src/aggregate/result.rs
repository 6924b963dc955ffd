//! Finalized aggregate handed to the caller

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

use crate::summary::Summary;

/// Read-only key to summary map, iterated in key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateMap {
    entries: BTreeMap<String, Summary>,
}

impl AggregateMap {
    pub fn get(&self, key: &str) -> Option<&Summary> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Summary> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, Summary> {
        self.entries.keys()
    }

    /// Number of values folded across every key
    pub fn total_count(&self) -> u64 {
        self.entries.values().map(Summary::count).sum()
    }
}

impl FromIterator<(String, Summary)> for AggregateMap {
    fn from_iter<I: IntoIterator<Item = (String, Summary)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AggregateMap {
    type Item = (String, Summary);
    type IntoIter = btree_map::IntoIter<String, Summary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregateMap {
    type Item = (&'a String, &'a Summary);
    type IntoIter = btree_map::Iter<'a, String, Summary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
