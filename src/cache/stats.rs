//! Cache Statistics Module
//!
//! Point-in-time summary of cache occupancy and eviction pressure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Cache Stats ==
/// A consistent snapshot of the cache's counters, taken under one lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries held
    #[serde(rename = "Length")]
    pub length: usize,
    /// Sum of the weights of all entries
    #[serde(rename = "Size")]
    pub size: u64,
    /// Configured weight budget
    #[serde(rename = "Capacity")]
    pub capacity: u64,
    /// Entries removed due to capacity pressure over the cache's lifetime
    #[serde(rename = "Evictions")]
    pub evictions: u64,
    /// Last access time of the least recently used entry, None when empty
    #[serde(rename = "OldestAccess")]
    pub oldest_access: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == To JSON ==
    /// Renders the snapshot as a flat JSON record.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
