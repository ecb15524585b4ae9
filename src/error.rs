//! Error types for the cache crate
//!
//! Only cache construction can fail; every operation on a built cache is infallible.

use thiserror::Error;

// == Cache Error Enum ==
/// Construction-time errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must hold at least one entry
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
