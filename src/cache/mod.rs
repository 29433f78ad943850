//! Cache Module
//!
//! Provides a size-bounded, thread-safe LRU cache.

mod entry;
mod list;
mod stats;
mod store;
mod value;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub(crate) use list::RecencyList;
pub use stats::CacheStats;
pub use store::{Item, LruCache};
pub use value::CacheValue;
