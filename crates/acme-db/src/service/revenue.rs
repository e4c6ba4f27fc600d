//! # Revenue Service
//!
//! Read access to the monthly revenue series feeding the dashboard chart.

use sqlx::SqlitePool;
use tracing::debug;

use acme_core::RevenuePoint;

use crate::cache::{Cache, KEY_REVENUE};
use crate::diagnostics::ErrorLog;
use crate::error::{DbError, DbResult};
use crate::service::log_failure;

/// Service for revenue reads.
#[derive(Clone)]
pub struct RevenueService {
    pool: SqlitePool,
    cache: Cache,
    errors: ErrorLog,
}

impl RevenueService {
    /// Creates a new RevenueService sharing the database's pool, cache, and
    /// error log.
    pub fn new(pool: SqlitePool, cache: Cache, errors: ErrorLog) -> Self {
        RevenueService {
            pool,
            cache,
            errors,
        }
    }

    /// Fetches the full revenue series.
    ///
    /// Cached under [`KEY_REVENUE`]; a hit skips the database entirely.
    pub async fn fetch_revenue(&self) -> DbResult<Vec<RevenuePoint>> {
        const OP: &str = "fetch_revenue";

        if let Some(hit) = self.cache.get::<Vec<RevenuePoint>>(KEY_REVENUE) {
            return Ok(hit);
        }

        debug!("Fetching revenue series");

        // rowid preserves insertion order, which is calendar order for the
        // seeded series.
        let points = sqlx::query_as::<_, RevenuePoint>(
            "SELECT month, revenue FROM revenue ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        debug!(count = points.len(), "Revenue series fetched");

        self.cache.set(KEY_REVENUE, &points);
        Ok(points)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::service::test_support::seeded_db;

    #[tokio::test]
    async fn test_fetch_revenue_returns_series_in_order() {
        let db = seeded_db().await;

        let series = db.revenue().fetch_revenue().await.unwrap();
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].month, "Jan");
        assert_eq!(series[11].month, "Dec");
        assert_eq!(series[11].revenue, 4800);
    }

    #[tokio::test]
    async fn test_fetch_revenue_is_cached() {
        let db = seeded_db().await;
        let service = db.revenue();

        let first = service.fetch_revenue().await.unwrap();

        // Remove the backing rows; a cache hit never touches the database.
        sqlx::query("DELETE FROM revenue")
            .execute(db.pool())
            .await
            .unwrap();

        let second = service.fetch_revenue().await.unwrap();
        assert_eq!(first, second);

        // Dropping the cache key exposes the emptied table.
        db.cache().delete(crate::cache::KEY_REVENUE);
        let third = service.fetch_revenue().await.unwrap();
        assert!(third.is_empty());
    }
}
