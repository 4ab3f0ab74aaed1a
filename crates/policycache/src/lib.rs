//! # policycache
//!
//! Policy-driven LRU cache: a recency-ordered key-value store that delegates
//! eviction decisions to an injectable policy.
//!
//! ## Architecture
//! - **Index**: AHash-backed map for O(1) lookups
//! - **Recency list**: slab-backed doubly-linked list for O(1) reordering
//!   and O(1) removal at either end
//! - **Policy**: asked about the oldest entry after every write; no policy
//!   means the cache is unbounded
//! - **Handler**: synchronous add/update/remove notifications
//!
//! ## Example
//!
//! ```
//! use policycache::{Cache, MaxCount};
//!
//! let mut cache = Cache::new().with_policy(MaxCount::new(2));
//! cache.add("foo", 1);
//! cache.add("bar", 2);
//! cache.add("baz", 3); // "foo" is now the oldest and gets evicted
//!
//! assert_eq!(cache.get(&"foo"), None);
//! assert_eq!(cache.get(&"baz"), Some(&3));
//! assert_eq!(cache.len(), 2);
//! ```

#![warn(missing_docs)]

mod cache;
mod handler;
mod policy;
mod stats;

pub use cache::Cache;
pub use handler::{AddedFn, Handler, RemovedFn};
pub use policy::{MaxCount, Policy, PolicyFn};
pub use stats::CacheStats;
