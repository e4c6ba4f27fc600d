//! # In-Process Cache
//!
//! Time-based key/value cache for shaped dashboard results.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Cache Policy                          │
//! │                                                             │
//! │  get(key)                                                   │
//! │    entry absent                 → miss                      │
//! │    now - stored_at <  ttl       → hit, return value         │
//! │    now - stored_at >= ttl       → miss; the stale entry     │
//! │                                   stays until overwritten   │
//! │                                   or deleted (no sweep)     │
//! │                                                             │
//! │  set(key, value)  → always overwrites, fresh timestamp      │
//! │  delete(key)      → removes the entry                       │
//! │  clear()          → removes everything                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the fixed aggregate reads are cached (`revenue`, `invoices_latest`,
//! `customers`, `card-data`); filtered reads stay uncached so free-text
//! queries cannot grow the key space.
//!
//! Entries live in a sharded concurrent map: two requests missing the same
//! key may both run the underlying query and both store the result. That is
//! duplicate work, not corruption; last write wins and the values converge.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// =============================================================================
// Cache Keys
// =============================================================================

/// Cache key for the revenue series.
pub const KEY_REVENUE: &str = "revenue";

/// Cache key for the invoice listing family.
pub const KEY_INVOICES: &str = "invoices";

/// Cache key for the latest-invoices dashboard card.
pub const KEY_INVOICES_LATEST: &str = "invoices_latest";

/// Cache key for the customer list.
pub const KEY_CUSTOMERS: &str = "customers";

/// Cache key for the summary-card aggregates.
pub const KEY_CARD_DATA: &str = "card-data";

// =============================================================================
// Cache
// =============================================================================

/// One stored value with its write timestamp.
struct CacheEntry {
    data: serde_json::Value,
    stored_at: Instant,
}

/// Process-wide TTL cache handle.
///
/// Explicitly constructed and injected into services — never a module-level
/// singleton — so tests get isolated instances. Cloning is cheap (Arc).
///
/// ## Example
/// ```rust
/// use acme_db::cache::Cache;
/// use std::time::Duration;
///
/// let cache = Cache::new(Duration::from_secs(300));
/// cache.set("revenue", &vec![1, 2, 3]);
/// let hit: Option<Vec<i32>> = cache.get("revenue");
/// assert_eq!(hit, Some(vec![1, 2, 3]));
/// ```
#[derive(Clone)]
pub struct Cache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Cache {
    /// Creates an empty cache whose entries are valid for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Cache {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Returns the stored value if the entry exists and is within its TTL.
    ///
    /// An expired entry behaves as absent and is left in place (lazy
    /// expiry); memory is bounded by key cardinality, not time.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;

        if entry.stored_at.elapsed() >= self.ttl {
            debug!(key, "cache expired");
            return None;
        }

        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                // Shape mismatch between writer and reader; treat as a miss.
                warn!(key, error = %e, "cached value failed to deserialize");
                None
            }
        }
    }

    /// Stores a value under `key`, overwriting any previous entry with a
    /// fresh timestamp.
    ///
    /// A value that fails to serialize is dropped with a warning; a cache
    /// write never fails the read it decorates.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(data) => {
                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        data,
                        stored_at: Instant::now(),
                    },
                );
                debug!(key, "cache store");
            }
            Err(e) => {
                warn!(key, error = %e, "value failed to serialize; not cached");
            }
        }
    }

    /// Removes a single entry.
    pub fn delete(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(key, "cache invalidate");
        }
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
        debug!("cache cleared");
    }

    /// Entry count and key list, for diagnostics.
    ///
    /// Expired-but-unswept entries are counted; they still occupy memory.
    pub fn stats(&self) -> CacheStats {
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
