//! Sized LRU - a thread-safe, size-bounded LRU cache
//!
//! Holds a working set under a weight budget and evicts the least recently
//! used entries once the budget is exceeded. Values report their own weight
//! through [`CacheValue`].
//!
//! ```
//! use std::sync::Arc;
//! use sized_lru::LruCache;
//!
//! let cache: LruCache<String> = LruCache::new(10);
//! cache.set("a", Arc::new("123456".to_string())).unwrap();
//! cache.set("b", Arc::new("654321".to_string())).unwrap();
//!
//! assert!(cache.get("a").is_none());
//! assert_eq!(cache.evictions(), 1);
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, CacheValue, Item, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
