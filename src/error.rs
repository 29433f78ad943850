//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Cache lookups never
//! fail; a missing key is reported as `None`. Errors arise while building a
//! cache from configuration, or when a write would overflow the size counter.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A configuration variable was set to an unusable value
    #[error("Invalid value {value:?} for {var}: expected a non-negative integer")]
    InvalidConfig { var: String, value: String },

    /// Storing the value would overflow the summed weight; nothing was changed
    #[error("Cannot store {key:?}: size {size} would overflow cache size {total}")]
    SizeOverflow { key: String, size: u64, total: u64 },
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
