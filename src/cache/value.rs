//! Cache Value Module
//!
//! Defines the weight capability every cached value must provide.

// == Cache Value ==
/// A value that can be stored in an [`LruCache`](crate::cache::LruCache).
///
/// `size` reports the value's weight in whatever unit the caller picks
/// (bytes, item count, ...). The cache only sums these weights and compares
/// the total against its capacity. It must be pure: the cache reads it once
/// per insert/update and caches the result.
pub trait CacheValue {
    fn size(&self) -> u64;
}

impl CacheValue for str {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl CacheValue for String {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl CacheValue for [u8] {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl CacheValue for Vec<u8> {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}
