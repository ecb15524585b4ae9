//! Cache Module
//!
//! Provides an in-process LRU cache with TTL expiration and generational purge.

mod entry;
mod lru;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::Entry;
pub use lru::{EvictionList, OldestFirst};
pub use stats::CacheStats;
pub use store::LruCache;

// == Cache Trait ==
/// Operations every cache handed out by a [`CacheProvider`](crate::CacheProvider) supports.
///
/// None of them fail: a lookup either finds a live value or reports absence,
/// without distinguishing a key that never existed from one that was evicted,
/// purged, or expired.
pub trait Cache<K, V>: Send + Sync {
    /// Inserts or overwrites `key` with no expiry.
    fn add(&self, key: K, value: V);

    /// Inserts or overwrites `key` using the cache's default expiry.
    fn add_with_default_expires(&self, key: K, value: V);

    /// Inserts or overwrites `key`, expiring after `expire_secs` seconds (<= 0 means never).
    fn add_with_expires_in_secs(&self, key: K, value: V, expire_secs: i64);

    /// Returns the live value for `key`, if any.
    fn get(&self, key: &K) -> Option<V>;

    /// Atomically returns the live value for `key`, or stores `value`.
    ///
    /// The flag is true when an existing value was loaded. A zero `ttl` means no expiry.
    fn get_or_add(&self, key: K, value: V, ttl: Duration) -> (V, bool);

    fn remove(&self, key: &K);

    /// Invalidates every entry at once.
    fn purge(&self);

    /// Live keys, least recently used first.
    fn keys(&self) -> Vec<K>;

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name(&self) -> &str;

    /// Cluster event an external messaging layer maps to [`purge`](Self::purge).
    fn invalidate_cluster_event(&self) -> &str;
}
