//! # Error Log
//!
//! Size-bounded ring buffer of recent data-layer failures.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Database ──owns──► ErrorLog ◄──handles held by── services  │
//! │                                                             │
//! │  Explicitly constructed and injected; no hidden global      │
//! │  registration. Capacity-bounded: the oldest record is       │
//! │  dropped once the buffer is full.                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services record every failure they propagate; the log never replaces
//! propagation, it only observes it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::error;

use crate::error::DbError;

/// Maximum number of records kept in memory.
pub const ERROR_LOG_CAPACITY: usize = 100;

/// How many records `stats()` returns in its `recent` slice.
const RECENT_WINDOW: usize = 10;

// =============================================================================
// Records
// =============================================================================

/// One recorded failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Stable error code (`VALIDATION_ERROR`, `NOT_FOUND`, ...).
    pub code: &'static str,

    /// HTTP-style status.
    pub status: u16,

    /// Data-service operation that failed, e.g. `create_invoice`.
    pub operation: String,

    /// Human-readable message.
    pub message: String,

    /// When the failure was recorded.
    pub at: DateTime<Utc>,
}

/// Aggregated view over the buffered records.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorStats {
    pub total: usize,
    pub by_code: HashMap<&'static str, usize>,
    pub by_status: HashMap<u16, usize>,
    pub recent: Vec<ErrorRecord>,
}

// =============================================================================
// Error Log
// =============================================================================

/// Shared handle to the ring buffer. Cloning is cheap (Arc).
///
/// The mutex guards only short push/snapshot sections and is never held
/// across an await point.
#[derive(Clone)]
pub struct ErrorLog {
    records: Arc<Mutex<VecDeque<ErrorRecord>>>,
}

impl ErrorLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        ErrorLog {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(ERROR_LOG_CAPACITY))),
        }
    }

    /// Records a failure from the named operation, evicting the oldest
    /// record when the buffer is full. Also emits a tracing event.
    pub fn record(&self, operation: &str, err: &DbError) {
        error!(operation, code = err.code(), error = %err, "data-layer failure");

        let record = ErrorRecord {
            code: err.code(),
            status: err.status(),
            operation: operation.to_string(),
            message: err.to_string(),
            at: Utc::now(),
        };

        let mut records = match self.records.lock() {
            Ok(guard) => guard,
            // A panic while holding the lock only loses diagnostics.
            Err(poisoned) => poisoned.into_inner(),
        };
        if records.len() == ERROR_LOG_CAPACITY {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Aggregate statistics plus the most recent records.
    pub fn stats(&self) -> ErrorStats {
        let records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut by_code: HashMap<&'static str, usize> = HashMap::new();
        let mut by_status: HashMap<u16, usize> = HashMap::new();
        for r in records.iter() {
            *by_code.entry(r.code).or_default() += 1;
            *by_status.entry(r.status).or_default() += 1;
        }

        let recent = records
            .iter()
            .rev()
            .take(RECENT_WINDOW)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        ErrorStats {
            total: records.len(),
            by_code,
            by_status,
            recent,
        }
    }

    /// Empties the buffer.
    pub fn clear(&self) {
        let mut records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.clear();
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_stats() {
        let log = ErrorLog::new();
        log.record("fetch_revenue", &DbError::not_found("Revenue", "2024"));
        log.record(
            "create_invoice",
            &DbError::QueryFailed {
                operation: "create_invoice".to_string(),
                message: "disk I/O error".to_string(),
            },
        );

        let stats = log.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_code.get("NOT_FOUND"), Some(&1));
        assert_eq!(stats.by_code.get("DATABASE_ERROR"), Some(&1));
        assert_eq!(stats.by_status.get(&404), Some(&1));
        assert_eq!(stats.by_status.get(&500), Some(&1));
        assert_eq!(stats.recent.len(), 2);
        assert_eq!(stats.recent[1].operation, "create_invoice");
    }

    #[test]
    fn test_capacity_bound_evicts_oldest() {
        let log = ErrorLog::new();
        for i in 0..(ERROR_LOG_CAPACITY + 25) {
            log.record("op", &DbError::not_found("Invoice", i.to_string()));
        }

        let stats = log.stats();
        assert_eq!(stats.total, ERROR_LOG_CAPACITY);

        // The newest record survived; the very first ones were evicted.
        let newest = &stats.recent[stats.recent.len() - 1];
        assert!(newest.message.contains(&(ERROR_LOG_CAPACITY + 24).to_string()));
    }

    #[test]
    fn test_recent_window_is_bounded() {
        let log = ErrorLog::new();
        for i in 0..30 {
            log.record("op", &DbError::not_found("Invoice", i.to_string()));
        }

        let stats = log.stats();
        assert_eq!(stats.recent.len(), 10);
        // Ordered oldest → newest within the window.
        assert!(stats.recent[0].message.contains("20"));
        assert!(stats.recent[9].message.contains("29"));
    }

    #[test]
    fn test_clear() {
        let log = ErrorLog::new();
        log.record("op", &DbError::Unauthorized);
        log.clear();
        assert_eq!(log.stats().total, 0);
    }
}
