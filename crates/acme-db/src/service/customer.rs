//! # Customer Service
//!
//! Read access to customers and their per-customer invoice totals.
//!
//! Customers have no mutation path in the dashboard; the table is maintained
//! out of band (see the seed binary).

use sqlx::SqlitePool;
use tracing::debug;

use acme_core::format::format_currency_default;
use acme_core::validation::validate_search_query;
use acme_core::{Customer, CustomerSummary};

use crate::cache::{Cache, KEY_CUSTOMERS};
use crate::diagnostics::ErrorLog;
use crate::error::{DbError, DbResult};
use crate::service::log_failure;

/// Raw aggregate row before currency formatting.
#[derive(sqlx::FromRow)]
struct CustomerSummaryRaw {
    id: String,
    name: String,
    email: String,
    image_url: String,
    total_invoices: i64,
    total_pending: i64,
    total_paid: i64,
}

/// Service for customer reads.
#[derive(Clone)]
pub struct CustomerService {
    pool: SqlitePool,
    cache: Cache,
    errors: ErrorLog,
}

impl CustomerService {
    /// Creates a new CustomerService sharing the database's pool, cache, and
    /// error log.
    pub fn new(pool: SqlitePool, cache: Cache, errors: ErrorLog) -> Self {
        CustomerService {
            pool,
            cache,
            errors,
        }
    }

    /// Fetches every customer, ordered by name.
    ///
    /// Cached under [`KEY_CUSTOMERS`].
    pub async fn fetch_customers(&self) -> DbResult<Vec<Customer>> {
        const OP: &str = "fetch_customers";

        if let Some(hit) = self.cache.get::<Vec<Customer>>(KEY_CUSTOMERS) {
            return Ok(hit);
        }

        debug!("Fetching customers");

        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, image_url FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        self.cache.set(KEY_CUSTOMERS, &customers);
        Ok(customers)
    }

    /// Fetches customers matching a free-text query, with their invoice
    /// counts and formatted pending/paid totals.
    ///
    /// Uncached: the query space is unbounded. Matching is a
    /// case-insensitive substring check against name and email.
    pub async fn fetch_filtered_customers(&self, query: &str) -> DbResult<Vec<CustomerSummary>> {
        const OP: &str = "fetch_filtered_customers";

        validate_search_query(query)
            .map_err(|e| log_failure(&self.errors, OP, DbError::Validation(e)))?;

        debug!(query, "Fetching filtered customers");

        let rows = sqlx::query_as::<_, CustomerSummaryRaw>(
            "SELECT c.id, c.name, c.email, c.image_url, \
                    COUNT(i.id) AS total_invoices, \
                    COALESCE(SUM(CASE WHEN i.status = 'pending' THEN i.amount_cents ELSE 0 END), 0) \
                        AS total_pending, \
                    COALESCE(SUM(CASE WHEN i.status = 'paid' THEN i.amount_cents ELSE 0 END), 0) \
                        AS total_paid \
             FROM customers c \
             LEFT JOIN invoices i ON c.id = i.customer_id \
             WHERE c.name LIKE ?1 OR c.email LIKE ?1 \
             GROUP BY c.id, c.name, c.email, c.image_url \
             ORDER BY c.name",
        )
        .bind(format!("%{}%", query.trim()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        let summaries = rows
            .into_iter()
            .map(|r| CustomerSummary {
                id: r.id,
                name: r.name,
                email: r.email,
                image_url: r.image_url,
                total_invoices: r.total_invoices,
                total_pending: format_currency_default(r.total_pending),
                total_paid: format_currency_default(r.total_paid),
            })
            .collect();

        Ok(summaries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::cache::KEY_CUSTOMERS;
    use crate::service::test_support::seeded_db;

    #[tokio::test]
    async fn test_fetch_customers_ordered_by_name() {
        let db = seeded_db().await;

        let customers = db.customers().fetch_customers().await.unwrap();
        assert_eq!(customers.len(), 3);
        assert_eq!(customers[0].name, "Delba de Oliveira");
        assert_eq!(customers[1].name, "Evil Rabbit");
        assert_eq!(customers[2].name, "Lee Robinson");
    }

    #[tokio::test]
    async fn test_fetch_customers_is_cached() {
        let db = seeded_db().await;
        let service = db.customers();

        service.fetch_customers().await.unwrap();
        assert!(db
            .cache_stats()
            .keys
            .contains(&KEY_CUSTOMERS.to_string()));

        // Cache hit survives the table being emptied underneath.
        sqlx::query("DELETE FROM invoices").execute(db.pool()).await.unwrap();
        sqlx::query("DELETE FROM customers").execute(db.pool()).await.unwrap();
        let cached = service.fetch_customers().await.unwrap();
        assert_eq!(cached.len(), 3);
    }

    #[tokio::test]
    async fn test_filtered_customers_totals() {
        let db = seeded_db().await;

        let summaries = db
            .customers()
            .fetch_filtered_customers("delba")
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);

        let delba = &summaries[0];
        assert_eq!(delba.total_invoices, 3);
        // pending: 2_054_100; paid: 3_454_500 + 89_890 = 3_544_390
        assert_eq!(delba.total_pending, "Rp20.541");
        assert_eq!(delba.total_paid, "Rp35.443,90");
    }

    #[tokio::test]
    async fn test_filtered_customers_matches_email() {
        let db = seeded_db().await;

        let summaries = db
            .customers()
            .fetch_filtered_customers("ROBINSON.COM")
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Lee Robinson");
    }

    #[tokio::test]
    async fn test_filtered_customers_empty_query_returns_everyone() {
        let db = seeded_db().await;

        let summaries = db.customers().fetch_filtered_customers("").await.unwrap();
        assert_eq!(summaries.len(), 3);

        // Uncached even when the query is empty.
        assert_eq!(db.cache_stats().size, 0);
    }
}
