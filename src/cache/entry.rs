//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their access bookkeeping.

use std::sync::Arc;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single cache entry with its value and metadata.
#[derive(Debug)]
pub struct CacheEntry<V: ?Sized> {
    /// The key this entry is indexed under
    pub key: String,
    /// The stored value, shared with the caller
    pub value: Arc<V>,
    /// Weight captured when the value was stored
    pub size: u64,
    /// Last time the entry was read with `get` or written
    pub last_access: DateTime<Utc>,
}

impl<V: ?Sized> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `value` - The shared value
    /// * `size` - The value's weight, read once by the caller
    /// * `now` - Access timestamp to record
    pub fn new(key: String, value: Arc<V>, size: u64, now: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            size,
            last_access: now,
        }
    }

    // == Replace ==
    /// Swaps in a new value and its weight.
    ///
    /// Returns the previous weight so the caller can adjust its running total.
    pub fn replace(&mut self, value: Arc<V>, size: u64) -> u64 {
        let old_size = self.size;
        self.value = value;
        self.size = size;
        old_size
    }

    // == Touch ==
    /// Records an access at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_access = now;
    }
}
