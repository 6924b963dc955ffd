//! # Aggregation
//!
//! Two levels of aggregation keep synchronization off the per-record path:
//!
//! - [`LocalAggregate`]: a worker-private map folded single-threaded, one
//!   batch at a time.
//! - [`AggregateStore`]: the shared map that local aggregates are merged into.
//!   Merges are atomic per key; the locking strategy lives behind the trait so
//!   workers never depend on it.
//!
//! Once every worker has finished, the store is frozen into an
//! [`AggregateMap`] and handed to the caller.

pub mod local;
pub mod result;
pub mod store;

pub use local::{FoldStats, LocalAggregate};
pub use result::AggregateMap;
pub use store::{new_store, AggregateStore, LockedAggregateStore, ShardedAggregateStore};
