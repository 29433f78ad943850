//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Environment variable holding the cache's weight budget.
pub const CAPACITY_ENV: &str = "SIZED_LRU_CAPACITY";

/// Default weight budget: 64 MiB when weights are bytes.
pub const DEFAULT_CAPACITY: u64 = 64 * 1024 * 1024;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Upper bound on the summed weight of all entries
    pub capacity: u64,
}

impl CacheConfig {
    /// Creates a config with the given capacity.
    pub fn new(capacity: u64) -> Self {
        Self { capacity }
    }

    /// Loads the config from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// # Environment Variables
    /// - `SIZED_LRU_CAPACITY` - Weight budget (default: 67108864)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var(CAPACITY_ENV)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        }
    }

    /// Like [`from_env`](Self::from_env) but rejects values that are set
    /// and cannot be parsed.
    pub fn try_from_env() -> Result<Self> {
        let capacity = match env::var(CAPACITY_ENV) {
            Ok(raw) => parse_capacity(&raw)?,
            Err(_) => DEFAULT_CAPACITY,
        };
        Ok(Self { capacity })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

fn parse_capacity(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| CacheError::InvalidConfig {
            var: CAPACITY_ENV.to_string(),
            value: raw.to_string(),
        })
}
