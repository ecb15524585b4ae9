//! gencache - A generational, TTL-aware, fixed-capacity LRU cache
//!
//! Provides thread-safe in-process caching with per-entry expiry and O(1)
//! whole-cache invalidation through generation tagging.

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;

pub use cache::{Cache, CacheStats, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use provider::{CacheProvider, LruCacheProvider};
