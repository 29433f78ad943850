//! Cache Store Module
//!
//! Main cache engine combining a key index with an arena-backed recency list,
//! both guarded by a single lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::cache::{CacheEntry, CacheStats, CacheValue, RecencyList};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Item ==
/// A key/value pair returned by [`LruCache::items`].
#[derive(Debug)]
pub struct Item<V: ?Sized> {
    pub key: String,
    pub value: Arc<V>,
}

impl<V: ?Sized> Clone for Item<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: Arc::clone(&self.value),
        }
    }
}

// == Inner State ==
/// Everything the lock protects. Index and list always hold the same keys.
struct Inner<V: ?Sized> {
    /// Key -> list handle
    index: HashMap<String, usize>,
    /// Entries ordered most recent first
    list: RecencyList<CacheEntry<V>>,
    /// Sum of entry sizes
    size: u64,
    capacity: u64,
    /// Lifetime eviction count, survives `clear`
    evictions: u64,
}

impl<V: ?Sized> Inner<V> {
    fn new(capacity: u64) -> Self {
        Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            size: 0,
            capacity,
            evictions: 0,
        }
    }

    /// Timestamp for a new access. Never earlier than the current front entry,
    /// so list order and access times agree even if the wall clock steps back.
    fn access_time(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.list.front().and_then(|handle| self.list.get(handle)) {
            Some(front) => now.max(front.last_access),
            None => now,
        }
    }

    fn touch(&mut self, handle: usize) {
        let now = self.access_time();
        self.list.move_to_front(handle);
        if let Some(entry) = self.list.get_mut(handle) {
            entry.touch(now);
        }
    }

    /// Fails without touching any state if the new total would overflow.
    fn add_new(&mut self, key: String, value: Arc<V>, size: u64) -> Result<()> {
        let total = self.checked_total(&key, self.size, size)?;
        let now = self.access_time();
        let handle = self
            .list
            .push_front(CacheEntry::new(key.clone(), value, size, now));
        self.index.insert(key, handle);
        self.size = total;
        Ok(())
    }

    fn update_in_place(&mut self, handle: usize, value: Arc<V>, size: u64) -> Result<()> {
        let Some(entry) = self.list.get(handle) else {
            return Ok(());
        };
        let total = self.checked_total(&entry.key, self.size - entry.size, size)?;
        if let Some(entry) = self.list.get_mut(handle) {
            entry.replace(value, size);
        }
        self.size = total;
        self.touch(handle);
        Ok(())
    }

    fn checked_total(&self, key: &str, base: u64, size: u64) -> Result<u64> {
        base.checked_add(size).ok_or_else(|| {
            warn!(
                "Rejected '{}': size {} would overflow cache size {}",
                key, size, base
            );
            CacheError::SizeOverflow {
                key: key.to_string(),
                size,
                total: base,
            }
        })
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let handle = self.index.remove(key)?;
        let entry = self.list.remove(handle)?;
        self.size -= entry.size;
        Some(entry)
    }

    /// Evicts from the back until the size fits the capacity or nothing is left.
    fn enforce_capacity(&mut self) -> u64 {
        let mut evicted = 0;
        while self.size > self.capacity {
            let Some(entry) = self.list.pop_back() else {
                break;
            };
            self.index.remove(&entry.key);
            self.size -= entry.size;
            self.evictions += 1;
            evicted += 1;
            debug!(
                "Evicted '{}' (size {}), cache size now {}/{}",
                entry.key, entry.size, self.size, self.capacity
            );
        }
        evicted
    }

    fn oldest(&self) -> Option<DateTime<Utc>> {
        self.list
            .back()
            .and_then(|handle| self.list.get(handle))
            .map(|entry| entry.last_access)
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            length: self.list.len(),
            size: self.size,
            capacity: self.capacity,
            evictions: self.evictions,
            oldest_access: self.oldest(),
        }
    }
}

// == LRU Cache ==
/// Thread-safe LRU cache bounded by the summed weight of its values.
///
/// Every operation, reads included, takes the same exclusive lock, so the
/// recency order is exact across all callers. Values are shared through
/// `Arc`; the cache never clones or mutates them.
pub struct LruCache<V: ?Sized> {
    inner: Mutex<Inner<V>>,
}

impl<V: CacheValue + ?Sized> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` weight units.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Mutex::new(Inner::new(capacity)),
        }
    }

    /// Creates an empty cache from a loaded [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Self {
        info!("Creating LRU cache with capacity {}", config.capacity);
        Self::new(config.capacity)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let mut inner = self.inner.lock();
        let handle = *inner.index.get(key)?;
        inner.touch(handle);
        trace!("Cache hit for '{}'", key);
        inner.list.get(handle).map(|entry| Arc::clone(&entry.value))
    }

    // == Peek ==
    /// Returns the value for `key` without changing its eviction priority.
    pub fn peek(&self, key: &str) -> Option<Arc<V>> {
        let inner = self.inner.lock();
        let handle = *inner.index.get(key)?;
        inner.list.get(handle).map(|entry| Arc::clone(&entry.value))
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing value in place.
    ///
    /// The entry becomes most recently used, then least recently used entries
    /// are evicted until the total size fits the capacity. A value heavier
    /// than the whole capacity is evicted straight away.
    ///
    /// Returns [`CacheError::SizeOverflow`] and leaves the cache untouched if
    /// the summed weight would not fit in a `u64`.
    pub fn set(&self, key: impl Into<String>, value: Arc<V>) -> Result<()> {
        let key = key.into();
        let size = value.size();

        let mut inner = self.inner.lock();
        match inner.index.get(&key).copied() {
            Some(handle) => inner.update_in_place(handle, value, size)?,
            None => inner.add_new(key, value, size)?,
        }
        inner.enforce_capacity();
        Ok(())
    }

    // == Set If Absent ==
    /// Stores `value` only if `key` is missing.
    ///
    /// An existing entry keeps its value but is marked most recently used.
    /// Fails like [`set`](Self::set) when inserting would overflow the size.
    pub fn set_if_absent(&self, key: impl Into<String>, value: Arc<V>) -> Result<()> {
        let key = key.into();
        let size = value.size();

        let mut inner = self.inner.lock();
        match inner.index.get(&key).copied() {
            Some(handle) => inner.touch(handle),
            None => {
                inner.add_new(key, value, size)?;
                inner.enforce_capacity();
            }
        }
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was removed.
    ///
    /// Explicit removal does not count as an eviction.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. The eviction counter is kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let removed = inner.list.len();
        inner.index.clear();
        inner.list.clear();
        inner.size = 0;
        info!("Cleared {} entries from cache", removed);
    }

    // == Set Capacity ==
    /// Changes the capacity and evicts immediately if the cache no longer fits.
    pub fn set_capacity(&self, capacity: u64) {
        let mut inner = self.inner.lock();
        let previous = inner.capacity;
        inner.capacity = capacity;
        let evicted = inner.enforce_capacity();
        debug!(
            "Capacity changed from {} to {}, evicted {} entries",
            previous, capacity, evicted
        );
    }

    // == Accessors ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().list.is_empty()
    }

    /// Returns the summed weight of all entries.
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    pub fn capacity(&self) -> u64 {
        self.inner.lock().capacity
    }

    /// Returns how many entries were evicted over the cache's lifetime.
    pub fn evictions(&self) -> u64 {
        self.inner.lock().evictions
    }

    /// Returns the last access time of the least recently used entry.
    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().oldest()
    }

    // == Snapshots ==
    /// Returns all keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let inner = self.inner.lock();
        inner.list.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Returns all key/value pairs from most to least recently used.
    pub fn items(&self) -> Vec<Item<V>> {
        let inner = self.inner.lock();
        inner
            .list
            .iter()
            .map(|entry| Item {
                key: entry.key.clone(),
                value: Arc::clone(&entry.value),
            })
            .collect()
    }

    // == Stats ==
    /// Returns a consistent snapshot of length, size, capacity, evictions and
    /// the oldest access time.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Returns [`stats`](Self::stats) rendered as a flat JSON record.
    pub fn stats_json(&self) -> String {
        self.stats().to_json()
    }

    /// Panics if the index, the list and the size counter disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let inner = self.inner.lock();

        assert_eq!(inner.index.len(), inner.list.len(), "index/list length mismatch");
        for (key, &handle) in &inner.index {
            let entry = inner.list.get(handle).expect("index points at a vacant slot");
            assert_eq!(&entry.key, key, "index handle points at another key");
        }

        let listed: Vec<&CacheEntry<V>> = inner.list.iter().collect();
        assert_eq!(listed.len(), inner.list.len(), "list traversal length mismatch");
        for entry in &listed {
            assert!(inner.index.contains_key(&entry.key), "orphan list entry");
        }

        let total: u64 = listed.iter().map(|entry| entry.size).sum();
        assert_eq!(total, inner.size, "size counter drifted");

        for pair in listed.windows(2) {
            assert!(pair[0].last_access >= pair[1].last_access, "recency order broken");
        }
    }
}

impl<V: CacheValue + ?Sized> Default for LruCache<V> {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl<V: ?Sized> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.inner.lock().stats();
        f.debug_struct("LruCache")
            .field("length", &stats.length)
            .field("size", &stats.size)
            .field("capacity", &stats.capacity)
            .field("evictions", &stats.evictions)
            .finish()
    }
}
