//! Cache Provider Module
//!
//! Builds cache handles for callers. A provider keeps no reference to the caches
//! it creates; callers own and pass the returned handles explicitly.

use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{Cache, LruCache};
use crate::config::CacheConfig;
use crate::error::Result;

// == Provider Trait ==
/// Factory for named, parameterized caches.
pub trait CacheProvider {
    /// Creates an unnamed cache holding at most `size` entries, with no default expiry.
    fn new_cache<K, V>(&self, size: usize) -> Result<Arc<dyn Cache<K, V>>>
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.new_cache_with_params(CacheConfig::with_size(size))
    }

    /// Creates a cache from a full set of construction parameters.
    fn new_cache_with_params<K, V>(&self, config: CacheConfig) -> Result<Arc<dyn Cache<K, V>>>
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static;

    /// Releases resources held by the provider.
    fn close(&self) {}
}

// == LRU Provider ==
/// Provider of in-process [`LruCache`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruCacheProvider;

impl LruCacheProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CacheProvider for LruCacheProvider {
    fn new_cache_with_params<K, V>(&self, config: CacheConfig) -> Result<Arc<dyn Cache<K, V>>>
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let cache = LruCache::<K, V>::with_config(config)?;
        info!(
            cache = %cache.name(),
            size = cache.capacity(),
            default_ttl = ?cache.default_ttl(),
            "created lru cache"
        );

        let cache: Arc<dyn Cache<K, V>> = Arc::new(cache);
        Ok(cache)
    }

    /// Nothing to release for in-process caches.
    fn close(&self) {
        debug!("lru cache provider closed");
    }
}
