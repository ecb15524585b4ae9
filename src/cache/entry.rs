//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and generation tagging.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with its expiry and the generation it was written in.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// Identity of the entry, kept so eviction can clean up the index
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Cache generation active when this entry was last written
    pub generation: u64,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` after `now`.
    ///
    /// A TTL too large to represent as an instant is treated as no expiry.
    pub fn new(key: K, value: V, now: Instant, ttl: Option<Duration>, generation: u64) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_after(now, ttl),
            generation,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is expired only once `now` is strictly past its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    // == Is Live ==
    /// True if the entry belongs to `generation` and has not expired.
    pub fn is_live(&self, generation: u64, now: Instant) -> bool {
        self.generation == generation && !self.is_expired_at(now)
    }
}

/// Computes the absolute expiry for a relative TTL.
pub(crate) fn expiry_after(now: Instant, ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|ttl| now.checked_add(ttl))
}
