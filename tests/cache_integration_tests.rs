//! Integration Tests for the LRU Cache
//!
//! Exercises the public API end to end: eviction scenarios, value sharing,
//! stats export and concurrent use from several threads.

use std::sync::{Arc, Once};
use std::thread;

use serde_json::Value;
use sized_lru::{CacheConfig, CacheError, CacheStats, CacheValue, LruCache};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// == Helper Types ==

#[derive(Debug, PartialEq)]
struct CacheValueStub {
    size: u64,
}

impl CacheValue for CacheValueStub {
    fn size(&self) -> u64 {
        self.size
    }
}

fn stub(size: u64) -> Arc<CacheValueStub> {
    Arc::new(CacheValueStub { size })
}

#[derive(Debug)]
struct Blob(Vec<u8>);

impl CacheValue for Blob {
    fn size(&self) -> u64 {
        self.0.len() as u64
    }
}

static TRACING: Once = Once::new();

/// Installs a subscriber so eviction logs show up with `RUST_LOG=sized_lru=debug`.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "sized_lru=warn".into()))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

// == Basic Operations ==

#[test]
fn test_set_inserts_value() {
    init_tracing();
    let cache = LruCache::new(100);
    let data = stub(0);

    cache.set("key", Arc::clone(&data)).unwrap();

    let got = cache.get("key").expect("value should be present");
    assert!(Arc::ptr_eq(&got, &data));
    assert_eq!(cache.keys(), vec!["key"]);

    let items = cache.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, "key");
    assert!(Arc::ptr_eq(&items[0].value, &data));
}

#[test]
fn test_set_if_absent() {
    let cache = LruCache::new(100);
    let data = stub(0);

    cache.set_if_absent("key", Arc::clone(&data)).unwrap();
    assert!(Arc::ptr_eq(&cache.get("key").unwrap(), &data));

    cache.set_if_absent("key", stub(1)).unwrap();
    assert!(Arc::ptr_eq(&cache.get("key").unwrap(), &data));
}

#[test]
fn test_lookup_with_built_key() {
    let cache = LruCache::new(100);
    let data = stub(0);
    cache.set("key", Arc::clone(&data)).unwrap();

    let built = String::from_utf8(vec![b'k', b'e', b'y']).unwrap();
    assert!(Arc::ptr_eq(&cache.get(&built).unwrap(), &data));
}

#[test]
fn test_mixed_value_types() {
    let cache: LruCache<dyn CacheValue + Send + Sync> = LruCache::new(100);

    cache.set("text", Arc::new("hello".to_string())).unwrap();
    cache.set("blob", Arc::new(Blob(vec![0; 10]))).unwrap();
    cache.set("stub", Arc::new(CacheValueStub { size: 3 })).unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.size(), 18);
    assert_eq!(cache.get("blob").unwrap().size(), 10);
}

#[test]
fn test_string_values() {
    let cache: LruCache<String> = LruCache::new(8);

    cache.set("a", Arc::new("1234".to_string())).unwrap();
    cache.set("b", Arc::new("5678".to_string())).unwrap();
    cache.set("c", Arc::new("9".to_string())).unwrap();

    assert_eq!(cache.keys(), vec!["c", "b"]);
    assert_eq!(cache.get("b").unwrap().as_str(), "5678");
}

// == Recency and Eviction ==

#[test]
fn test_get_reorders() {
    let cache = LruCache::new(100);

    cache.set("A", stub(1)).unwrap();
    cache.set("B", stub(1)).unwrap();
    cache.set("C", stub(1)).unwrap();
    cache.get("A");

    assert_eq!(cache.keys(), vec!["A", "C", "B"]);
}

#[test]
fn test_eviction_of_least_recent() {
    init_tracing();
    let cache = LruCache::new(10);

    cache.set("a", stub(6)).unwrap();
    cache.set("b", stub(6)).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.evictions(), 1);
    assert!(cache.get("a").is_none());
    assert_eq!(*cache.get("b").unwrap(), CacheValueStub { size: 6 });
}

#[test]
fn test_update_in_place_is_not_eviction() {
    let cache = LruCache::new(100);

    cache.set("x", stub(5)).unwrap();
    cache.set("x", stub(8)).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.size(), 8);
    assert_eq!(cache.evictions(), 0);
}

#[test]
fn test_set_if_absent_does_not_overwrite() {
    let cache = LruCache::new(100);
    let first = stub(1);

    cache.set("x", Arc::clone(&first)).unwrap();
    cache.set_if_absent("x", stub(2)).unwrap();

    assert!(Arc::ptr_eq(&cache.get("x").unwrap(), &first));
    assert_eq!(cache.size(), 1);
}

#[test]
fn test_peek_does_not_promote() {
    let cache = LruCache::new(10);

    cache.set("A", stub(4)).unwrap();
    cache.set("B", stub(4)).unwrap();
    assert!(cache.peek("A").is_some());

    cache.set("C", stub(4)).unwrap();

    assert!(cache.peek("A").is_none());
    assert!(cache.peek("B").is_some());
    assert!(cache.peek("C").is_some());
}

#[test]
fn test_get_promotes_past_eviction() {
    let cache = LruCache::new(10);

    cache.set("A", stub(4)).unwrap();
    cache.set("B", stub(4)).unwrap();
    cache.get("A");

    cache.set("C", stub(4)).unwrap();

    assert!(cache.peek("A").is_some());
    assert!(cache.peek("B").is_none());
}

#[test]
fn test_clear_keeps_eviction_history() {
    let cache = LruCache::new(10);

    for i in 0..5 {
        cache.set(format!("k{}", i), stub(6)).unwrap();
    }
    let evictions = cache.evictions();
    assert_eq!(evictions, 4);

    cache.clear();

    assert_eq!(cache.len(), 0);
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.evictions(), evictions);

    // Still usable after clearing
    cache.set("again", stub(2)).unwrap();
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_shrinking_capacity_evicts_immediately() {
    let cache = LruCache::new(20);

    for key in ["a", "b", "c", "d"] {
        cache.set(key, stub(5)).unwrap();
    }
    assert_eq!(cache.size(), 20);

    cache.set_capacity(10);

    assert!(cache.size() <= 10);
    assert_eq!(cache.keys(), vec!["d", "c"]);
}

#[test]
fn test_growing_capacity_keeps_entries() {
    let cache = LruCache::new(10);

    cache.set("a", stub(5)).unwrap();
    cache.set("b", stub(5)).unwrap();
    cache.set_capacity(100);
    cache.set("c", stub(50)).unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.evictions(), 0);
}

#[test]
fn test_overflowing_write_leaves_cache_unchanged() {
    init_tracing();
    let cache = LruCache::new(u64::MAX);
    cache.set("a", stub(u64::MAX)).unwrap();
    let before = cache.stats();

    let err = cache.set("b", stub(1)).unwrap_err();

    assert!(matches!(err, CacheError::SizeOverflow { .. }));
    assert_eq!(cache.stats(), before);
    assert_eq!(cache.keys(), vec!["a"]);
    assert!(cache.peek("b").is_none());

    // The cache keeps working after the rejected write
    assert!(cache.delete("a"));
    cache.set("b", stub(1)).unwrap();
    assert_eq!(cache.size(), 1);
}

// == Stats ==

#[test]
fn test_oldest_on_empty_cache() {
    let cache: LruCache<CacheValueStub> = LruCache::new(10);
    assert!(cache.oldest().is_none());
    assert!(cache.stats().oldest_access.is_none());
}

#[test]
fn test_stats_snapshot() {
    let cache = LruCache::new(10);

    cache.set("a", stub(6)).unwrap();
    cache.set("b", stub(3)).unwrap();
    cache.set("c", stub(6)).unwrap();

    let stats = cache.stats();
    assert_eq!(
        stats,
        CacheStats {
            length: 2,
            size: 9,
            capacity: 10,
            evictions: 1,
            oldest_access: cache.oldest(),
        }
    );
}

#[test]
fn test_stats_json() {
    let cache = LruCache::new(64);
    cache.set("a", stub(16)).unwrap();

    let json: Value = serde_json::from_str(&cache.stats_json()).unwrap();

    assert_eq!(json["Length"], 1);
    assert_eq!(json["Size"], 16);
    assert_eq!(json["Capacity"], 64);
    assert_eq!(json["Evictions"], 0);
    assert!(json["OldestAccess"].is_string());

    let parsed: CacheStats = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.oldest_access, cache.oldest());
}

#[test]
fn test_from_config() {
    let cache: LruCache<CacheValueStub> = LruCache::from_config(&CacheConfig::new(3));

    cache.set("a", stub(2)).unwrap();
    cache.set("b", stub(2)).unwrap();

    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.keys(), vec!["b"]);
}

// == Concurrency ==

#[test]
fn test_concurrent_writers_respect_capacity() {
    init_tracing();
    let cache = Arc::new(LruCache::new(500));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500u64 {
                    let key = format!("t{}-k{}", t, i % 50);
                    cache.set(key.clone(), stub(i % 13)).unwrap();
                    cache.get(&key);
                    if i % 7 == 0 {
                        cache.delete(&format!("t{}-k{}", t, (i + 3) % 50));
                    }
                    assert!(cache.size() <= cache.capacity());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let summed: u64 = cache.items().iter().map(|item| item.value.size).sum();
    assert_eq!(summed, cache.size());
    assert_eq!(cache.keys().len(), cache.len());
    assert!(cache.size() <= 500);
}

#[test]
fn test_concurrent_capacity_changes() {
    let cache = Arc::new(LruCache::new(100));

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..2000u64 {
                cache.set(format!("k{}", i % 97), stub(1 + i % 5)).unwrap();
            }
        })
    };
    let resizer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..500u64 {
                cache.set_capacity(20 + (i % 4) * 40);
            }
        })
    };

    writer.join().unwrap();
    resizer.join().unwrap();

    let stats = cache.stats();
    assert!(stats.size <= stats.capacity);
    assert_eq!(stats.length, cache.keys().len());
}

#[test]
fn test_shared_values_outlive_eviction() {
    let cache = LruCache::new(5);
    let value = stub(5);

    cache.set("a", Arc::clone(&value)).unwrap();
    cache.set("b", stub(5)).unwrap();

    assert!(cache.get("a").is_none());
    assert_eq!(Arc::strong_count(&value), 1);
    assert_eq!(value.size, 5);
}
