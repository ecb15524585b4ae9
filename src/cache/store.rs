//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the eviction list, a TTL per
//! entry, and a generation counter that makes `purge` O(1).
//!
//! Every entry records the generation it was written in. `purge` only bumps the
//! cache generation; entries from older generations are treated as absent and are
//! physically reclaimed later, either when a lookup touches them or when capacity
//! pressure evicts them from the back of the list. Until then they keep occupying
//! slots, so a freshly purged cache evicts its stale entries before any live one.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::entry::expiry_after;
use crate::cache::{Cache, CacheStats, Entry, EvictionList};
use crate::config::{ttl_from_secs, CacheConfig};
use crate::error::Result;

/// State guarded by the cache lock as one consistency unit.
///
/// Invariant: a key is in `index` iff its entry is linked into `list`.
struct Inner<K, V> {
    index: HashMap<K, usize>,
    list: EvictionList<Entry<K, V>>,
    generation: u64,
    /// Entries whose generation equals `generation`
    len: usize,
    stats: CacheStats,
}

impl<K, V> Inner<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            list: EvictionList::new(),
            generation: 0,
            len: 0,
            stats: CacheStats::new(),
        }
    }

    fn add(&mut self, key: K, value: V, ttl: Option<Duration>, capacity: usize, name: &str) {
        let now = Instant::now();
        let generation = self.generation;

        // Existing node: overwrite in place, whatever generation it carries
        if let Some(&slot) = self.index.get(&key) {
            self.list.move_to_front(slot);
            if let Some(entry) = self.list.get_mut(slot) {
                entry.value = value;
                entry.expires_at = expiry_after(now, ttl);
                if entry.generation != generation {
                    entry.generation = generation;
                    self.len += 1;
                }
            }
            return;
        }

        let slot = self
            .list
            .push_front(Entry::new(key.clone(), value, now, ttl, generation));
        self.index.insert(key, slot);
        self.len += 1;

        // Physical slots, stale ones included, drive eviction
        if self.list.len() > capacity {
            if let Some(back) = self.list.back() {
                if let Some(evicted) = self.remove_slot(back) {
                    self.stats.record_eviction();
                    trace!(
                        cache = name,
                        stale = evicted.generation != generation,
                        "evicted least recently used entry"
                    );
                }
            }
        }
    }

    fn get_value<Q>(&mut self, key: &Q, name: &str) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        let generation = self.generation;
        let live = self
            .list
            .get(slot)
            .is_some_and(|entry| entry.is_live(generation, Instant::now()));

        if !live {
            self.remove_slot(slot);
            trace!(cache = name, "removed stale or expired entry on lookup");
            return None;
        }

        self.list.move_to_front(slot);
        self.list.get(slot).map(|entry| entry.value.clone())
    }

    fn remove_slot(&mut self, slot: usize) -> Option<Entry<K, V>> {
        let entry = self.list.remove(slot)?;
        if entry.generation == self.generation {
            self.len -= 1;
        }
        self.index.remove(&entry.key);
        Some(entry)
    }

    fn keys(&self) -> Vec<K> {
        let now = Instant::now();
        let mut keys = Vec::with_capacity(self.len);
        keys.extend(
            self.list
                .iter_oldest_first()
                .filter(|entry| entry.is_live(self.generation, now))
                .map(|entry| entry.key.clone()),
        );
        keys
    }
}

// == LRU Cache ==
/// Thread-safe fixed-capacity LRU cache with per-entry TTL and O(1) purge.
///
/// All state sits behind a single `RwLock`. Lookups take the write lock because
/// a hit reorders the eviction list and a miss may reclaim a stale entry;
/// `keys`, `len`, and `stats` only read and take the shared lock.
///
/// Values are returned by clone. Store `Arc<T>` to hand out shared handles.
pub struct LruCache<K, V> {
    inner: RwLock<Inner<K, V>>,
    capacity: usize,
    name: String,
    default_ttl: Option<Duration>,
    invalidate_cluster_event: String,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an unnamed cache holding at most `size` entries, with no default expiry.
    ///
    /// Fails with [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity)
    /// when `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_config(CacheConfig::with_size(size))
    }

    /// Creates a cache from a full set of construction parameters.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            inner: RwLock::new(Inner::new()),
            capacity: config.size,
            default_ttl: config.default_ttl(),
            name: config.name,
            invalidate_cluster_event: config.invalidate_cluster_event,
        })
    }

    // == Add ==
    /// Inserts or overwrites `key` with no expiry.
    pub fn add(&self, key: K, value: V) {
        self.add_with_ttl(key, value, None);
    }

    /// Inserts or overwrites `key`, expiring after the cache's default TTL.
    pub fn add_with_default_expires(&self, key: K, value: V) {
        self.add_with_ttl(key, value, self.default_ttl);
    }

    /// Inserts or overwrites `key`, expiring after `expire_secs` seconds.
    ///
    /// `expire_secs <= 0` stores the entry without expiry.
    pub fn add_with_expires_in_secs(&self, key: K, value: V, expire_secs: i64) {
        self.add_with_ttl(key, value, ttl_from_secs(expire_secs));
    }

    /// Inserts or overwrites `key` with an optional TTL.
    ///
    /// An existing node is updated in place and promoted, which revives it if a
    /// purge had made it stale. Only a new node can push out the least recently
    /// used one.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Option<Duration>) {
        let mut inner = self.inner.write();
        inner.add(key, value, ttl, self.capacity, &self.name);
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// Absent, stale, and expired keys all read as `None`; a stale or expired node
    /// is removed on the way out.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.write();
        let value = inner.get_value(key, &self.name);
        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        value
    }

    // == Get Or Add ==
    /// Returns the live value for `key` if there is one; otherwise stores `value`.
    ///
    /// The boolean is true when the value was loaded from the cache and false when
    /// `value` was stored. A zero `ttl` means no expiry. The check and the insert
    /// happen under one lock acquisition.
    pub fn get_or_add(&self, key: K, value: V, ttl: Duration) -> (V, bool) {
        let mut inner = self.inner.write();

        if let Some(actual) = inner.get_value(&key, &self.name) {
            inner.stats.record_hit();
            return (actual, true);
        }

        inner.stats.record_miss();
        let ttl = (!ttl.is_zero()).then_some(ttl);
        inner.add(key, value.clone(), ttl, self.capacity, &self.name);
        (value, false)
    }

    // == Remove ==
    /// Deletes `key` if present.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.write();
        if let Some(&slot) = inner.index.get(key) {
            inner.remove_slot(slot);
        }
    }

    // == Purge ==
    /// Invalidates every entry by starting a new generation.
    ///
    /// No node is unlinked here; stale nodes are reclaimed lazily.
    pub fn purge(&self) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.len = 0;
        inner.stats.record_purge();
        debug!(cache = %self.name, generation = inner.generation, "purged cache");
    }

    // == Keys ==
    /// Returns the live keys from least to most recently used.
    ///
    /// Entries past their TTL but not yet reclaimed are skipped. Recency order is
    /// left untouched.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys()
    }

    // == Length ==
    /// Returns the number of entries in the current generation.
    ///
    /// Expired entries count until a lookup reclaims them.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats {
            live_entries: inner.len,
            physical_entries: inner.list.len(),
            generation: inner.generation,
            ..inner.stats.clone()
        }
    }

    // == Accessors ==
    /// Maximum number of physical slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Identifies this cache among others in the process.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cluster event configured when this cache was created.
    pub fn invalidate_cluster_event(&self) -> &str {
        &self.invalidate_cluster_event
    }

    /// TTL applied by [`add_with_default_expires`](Self::add_with_default_expires).
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("LruCache")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("len", &inner.len)
            .field("generation", &inner.generation)
            .finish()
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn add(&self, key: K, value: V) {
        LruCache::add(self, key, value)
    }

    fn add_with_default_expires(&self, key: K, value: V) {
        LruCache::add_with_default_expires(self, key, value)
    }

    fn add_with_expires_in_secs(&self, key: K, value: V, expire_secs: i64) {
        LruCache::add_with_expires_in_secs(self, key, value, expire_secs)
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn get_or_add(&self, key: K, value: V, ttl: Duration) -> (V, bool) {
        LruCache::get_or_add(self, key, value, ttl)
    }

    fn remove(&self, key: &K) {
        LruCache::remove(self, key)
    }

    fn purge(&self) {
        LruCache::purge(self)
    }

    fn keys(&self) -> Vec<K> {
        LruCache::keys(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn name(&self) -> &str {
        LruCache::name(self)
    }

    fn invalidate_cluster_event(&self) -> &str {
        LruCache::invalidate_cluster_event(self)
    }
}
