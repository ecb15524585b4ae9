//! Configuration Module
//!
//! Construction parameters for a named cache, loadable from environment variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default capacity used when none is configured.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Parameters a provider needs to build a cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of physical slots
    pub size: usize,
    /// Identifies this cache among others in the process
    pub name: String,
    /// TTL in seconds applied by `add_with_default_expires`; <= 0 means no expiry
    pub default_expiry_secs: i64,
    /// Opaque cluster event correlated with `purge` by an external messaging layer
    pub invalidate_cluster_event: String,
}

impl CacheConfig {
    /// Creates a config with the given size and no name, expiry, or cluster event.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Creates a config for a named cache by loading values from environment variables.
    ///
    /// # Environment Variables
    /// `NAME` is `name` upper-cased with non-alphanumerics replaced by `_`.
    /// - `<NAME>_CACHE_SIZE` - Capacity (default: 1000)
    /// - `<NAME>_CACHE_DEFAULT_EXPIRY` - Default TTL in seconds (default: 0, no expiry)
    /// - `<NAME>_CACHE_INVALIDATE_EVENT` - Cluster invalidation event (default: empty)
    pub fn from_env(name: &str) -> Self {
        let prefix = env_prefix(name);

        Self {
            size: env::var(format!("{prefix}_CACHE_SIZE"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_SIZE),
            name: name.to_string(),
            default_expiry_secs: env::var(format!("{prefix}_CACHE_DEFAULT_EXPIRY"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            invalidate_cluster_event: env::var(format!("{prefix}_CACHE_INVALIDATE_EVENT"))
                .unwrap_or_default(),
        }
    }

    /// Rejects parameters a cache cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(CacheError::InvalidCapacity(self.size));
        }
        Ok(())
    }

    /// Returns the default TTL, or None when entries should not expire by default.
    pub fn default_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.default_expiry_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CACHE_SIZE,
            name: String::new(),
            default_expiry_secs: 0,
            invalidate_cluster_event: String::new(),
        }
    }
}

/// Converts a TTL in seconds to a duration; non-positive values mean no expiry.
pub(crate) fn ttl_from_secs(secs: i64) -> Option<Duration> {
    u64::try_from(secs)
        .ok()
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
}

fn env_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
