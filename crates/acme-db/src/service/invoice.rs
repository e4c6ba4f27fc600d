//! # Invoice Service
//!
//! Reads and mutations for invoices, including the dashboard cards that
//! aggregate over them.
//!
//! ## Caching Asymmetry
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  cached:    fetch_latest_invoices   (invoices_latest)       │
//! │             fetch_card_data         (card-data)             │
//! │                                                             │
//! │  uncached:  fetch_filtered_invoices                         │
//! │             fetch_invoices_pages                            │
//! │             fetch_invoice_by_id                             │
//! │                                                             │
//! │  Free-text queries form an unbounded key space; caching     │
//! │  them would grow the cache without bound.                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every successful mutation deletes the `invoices`, `invoices_latest`, and
//! `card-data` keys: coarse invalidation, no per-record precision.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use acme_core::format::format_currency_default;
use acme_core::validation::{validate_invoice_input, validate_search_query};
use acme_core::{CardData, InvoiceForm, InvoiceInput, InvoiceRow, LatestInvoice, ITEMS_PER_PAGE};

use crate::cache::{Cache, KEY_CARD_DATA, KEY_INVOICES, KEY_INVOICES_LATEST};
use crate::diagnostics::ErrorLog;
use crate::error::{DbError, DbResult};
use crate::retry::with_retry;
use crate::service::log_failure;

/// Rows shown on the "latest invoices" dashboard card.
const LATEST_INVOICES_LIMIT: u32 = 5;

/// Shared WHERE clause for the free-text invoice search: a row matches when
/// ANY searchable field contains the query, case-insensitively.
const INVOICE_MATCH: &str = "c.name LIKE ?1 \
     OR c.email LIKE ?1 \
     OR CAST(i.amount_cents AS TEXT) LIKE ?1 \
     OR i.date LIKE ?1";

/// Raw join row before currency formatting.
#[derive(sqlx::FromRow)]
struct LatestInvoiceRaw {
    id: String,
    name: String,
    email: String,
    image_url: String,
    amount_cents: i64,
}

/// Raw aggregate row backing the summary cards.
#[derive(sqlx::FromRow)]
struct CardTotalsRaw {
    invoice_count: i64,
    total_paid: i64,
    total_pending: i64,
}

/// Service for invoice reads and writes.
#[derive(Clone)]
pub struct InvoiceService {
    pool: SqlitePool,
    cache: Cache,
    errors: ErrorLog,
    retry_attempts: u32,
}

impl InvoiceService {
    /// Creates a new InvoiceService sharing the database's pool, cache, and
    /// error log.
    pub fn new(pool: SqlitePool, cache: Cache, errors: ErrorLog, retry_attempts: u32) -> Self {
        InvoiceService {
            pool,
            cache,
            errors,
            retry_attempts,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches the five most recent invoices with their customer, amounts
    /// pre-formatted for display.
    ///
    /// Cached under [`KEY_INVOICES_LATEST`].
    pub async fn fetch_latest_invoices(&self) -> DbResult<Vec<LatestInvoice>> {
        const OP: &str = "fetch_latest_invoices";

        if let Some(hit) = self.cache.get::<Vec<LatestInvoice>>(KEY_INVOICES_LATEST) {
            return Ok(hit);
        }

        debug!("Fetching latest invoices");

        let rows = sqlx::query_as::<_, LatestInvoiceRaw>(
            "SELECT i.id, c.name, c.email, c.image_url, i.amount_cents \
             FROM invoices i \
             JOIN customers c ON i.customer_id = c.id \
             ORDER BY i.date DESC \
             LIMIT ?1",
        )
        .bind(LATEST_INVOICES_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        let latest: Vec<LatestInvoice> = rows
            .into_iter()
            .map(|r| LatestInvoice {
                id: r.id,
                name: r.name,
                email: r.email,
                image_url: r.image_url,
                amount: format_currency_default(r.amount_cents),
            })
            .collect();

        self.cache.set(KEY_INVOICES_LATEST, &latest);
        Ok(latest)
    }

    /// Fetches the aggregate figures for the dashboard summary cards:
    /// entity counts plus formatted paid/pending totals.
    ///
    /// Cached under [`KEY_CARD_DATA`].
    pub async fn fetch_card_data(&self) -> DbResult<CardData> {
        const OP: &str = "fetch_card_data";

        if let Some(hit) = self.cache.get::<CardData>(KEY_CARD_DATA) {
            return Ok(hit);
        }

        debug!("Fetching card data");

        let customer_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        let totals = sqlx::query_as::<_, CardTotalsRaw>(
            "SELECT COUNT(*) AS invoice_count, \
                    COALESCE(SUM(CASE WHEN status = 'paid' THEN amount_cents ELSE 0 END), 0) \
                        AS total_paid, \
                    COALESCE(SUM(CASE WHEN status = 'pending' THEN amount_cents ELSE 0 END), 0) \
                        AS total_pending \
             FROM invoices",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        let cards = CardData {
            customer_count,
            invoice_count: totals.invoice_count,
            total_paid: format_currency_default(totals.total_paid),
            total_pending: format_currency_default(totals.total_pending),
        };

        self.cache.set(KEY_CARD_DATA, &cards);
        Ok(cards)
    }

    /// Fetches one page of invoices matching a free-text query.
    ///
    /// Uncached: the query space is unbounded. Page size is fixed at
    /// [`ITEMS_PER_PAGE`]; `current_page` starts at 1.
    pub async fn fetch_filtered_invoices(
        &self,
        query: &str,
        current_page: u32,
    ) -> DbResult<Vec<InvoiceRow>> {
        const OP: &str = "fetch_filtered_invoices";

        validate_search_query(query)
            .map_err(|e| log_failure(&self.errors, OP, DbError::Validation(e)))?;

        let offset = current_page.saturating_sub(1) * ITEMS_PER_PAGE;

        debug!(query, current_page, "Fetching filtered invoices");

        let sql = format!(
            "SELECT i.id, i.customer_id, c.name, c.email, c.image_url, \
                    i.date, i.amount_cents, i.status \
             FROM invoices i \
             JOIN customers c ON i.customer_id = c.id \
             WHERE {INVOICE_MATCH} \
             ORDER BY i.date DESC \
             LIMIT ?2 OFFSET ?3"
        );

        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(like_pattern(query))
            .bind(ITEMS_PER_PAGE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        debug!(count = rows.len(), "Filtered invoices fetched");
        Ok(rows)
    }

    /// Returns the number of pager pages for a free-text query:
    /// `ceil(match_count / ITEMS_PER_PAGE)`.
    pub async fn fetch_invoices_pages(&self, query: &str) -> DbResult<u64> {
        const OP: &str = "fetch_invoices_pages";

        validate_search_query(query)
            .map_err(|e| log_failure(&self.errors, OP, DbError::Validation(e)))?;

        let sql = format!(
            "SELECT COUNT(*) \
             FROM invoices i \
             JOIN customers c ON i.customer_id = c.id \
             WHERE {INVOICE_MATCH}"
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        Ok((count as u64).div_ceil(ITEMS_PER_PAGE as u64))
    }

    /// Fetches a single invoice in the shape the edit form consumes.
    /// The amount stays in minor units.
    pub async fn fetch_invoice_by_id(&self, id: &str) -> DbResult<InvoiceForm> {
        const OP: &str = "fetch_invoice_by_id";

        debug!(id, "Fetching invoice");

        let invoice = sqlx::query_as::<_, InvoiceForm>(
            "SELECT id, customer_id, amount_cents, status FROM invoices WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| log_failure(&self.errors, OP, DbError::query(OP, e)))?;

        invoice.ok_or_else(|| log_failure(&self.errors, OP, DbError::not_found("Invoice", id)))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates an invoice dated today and returns its generated id.
    ///
    /// Validation runs before any I/O; the insert runs under the retry
    /// wrapper; success invalidates the invoice-derived cache keys.
    pub async fn create_invoice(&self, input: &InvoiceInput) -> DbResult<String> {
        const OP: &str = "create_invoice";

        validate_invoice_input(input)
            .map_err(|e| log_failure(&self.errors, OP, DbError::Validation(e)))?;

        let id = Uuid::new_v4().to_string();
        let date = Utc::now().date_naive();

        debug!(id = %id, customer_id = %input.customer_id, "Creating invoice");

        with_retry(self.retry_attempts, || async {
            sqlx::query(
                "INSERT INTO invoices (id, customer_id, amount_cents, status, date) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&id)
            .bind(&input.customer_id)
            .bind(input.amount_cents)
            .bind(input.status.as_str())
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::query(OP, e))?;
            Ok(())
        })
        .await
        .map_err(|e| log_failure(&self.errors, OP, e))?;

        self.invalidate_invoice_caches();
        Ok(id)
    }

    /// Updates an invoice's customer, amount, and status.
    pub async fn update_invoice(&self, id: &str, input: &InvoiceInput) -> DbResult<()> {
        const OP: &str = "update_invoice";

        validate_invoice_input(input)
            .map_err(|e| log_failure(&self.errors, OP, DbError::Validation(e)))?;

        debug!(id, "Updating invoice");

        with_retry(self.retry_attempts, || async {
            let result = sqlx::query(
                "UPDATE invoices SET customer_id = ?2, amount_cents = ?3, status = ?4 \
                 WHERE id = ?1",
            )
            .bind(id)
            .bind(&input.customer_id)
            .bind(input.amount_cents)
            .bind(input.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::query(OP, e))?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Invoice", id));
            }
            Ok(())
        })
        .await
        .map_err(|e| log_failure(&self.errors, OP, e))?;

        self.invalidate_invoice_caches();
        Ok(())
    }

    /// Deletes an invoice.
    pub async fn delete_invoice(&self, id: &str) -> DbResult<()> {
        const OP: &str = "delete_invoice";

        debug!(id, "Deleting invoice");

        with_retry(self.retry_attempts, || async {
            let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| DbError::query(OP, e))?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Invoice", id));
            }
            Ok(())
        })
        .await
        .map_err(|e| log_failure(&self.errors, OP, e))?;

        self.invalidate_invoice_caches();
        Ok(())
    }

    /// Coarse invalidation after any successful mutation: every cached shape
    /// derived from invoices is dropped, so the next read re-fetches.
    fn invalidate_invoice_caches(&self) {
        self.cache.delete(KEY_INVOICES);
        self.cache.delete(KEY_INVOICES_LATEST);
        self.cache.delete(KEY_CARD_DATA);
    }
}

/// Substring LIKE pattern for a raw query. SQLite's LIKE is
/// case-insensitive for ASCII, which covers the dashboard's search fields.
fn like_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{invoice_id, seeded_db, CUSTOMER_DELBA, CUSTOMER_LEE};
    use acme_core::InvoiceStatus;

    fn input(customer_id: &str, amount_cents: i64, status: InvoiceStatus) -> InvoiceInput {
        InvoiceInput {
            customer_id: customer_id.to_string(),
            amount_cents,
            status,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_latest_invoices_newest_first_with_formatted_amounts() {
        let db = seeded_db().await;

        let latest = db.invoices().fetch_latest_invoices().await.unwrap();
        assert_eq!(latest.len(), 5);

        // Newest fixture invoice: 2023-12-06, Evil Rabbit, 1_577_400 cents.
        assert_eq!(latest[0].name, "Evil Rabbit");
        assert_eq!(latest[0].amount, "Rp15.774");
        assert_eq!(latest[1].name, "Delba de Oliveira");
    }

    #[tokio::test]
    async fn test_card_data_counts_and_totals() {
        let db = seeded_db().await;

        let cards = db.invoices().fetch_card_data().await.unwrap();
        assert_eq!(cards.customer_count, 3);
        assert_eq!(cards.invoice_count, 8);

        // paid: 304_000 + 4_480_000 + 3_454_500 + 50_000 + 89_890 = 8_378_390
        assert_eq!(cards.total_paid, "Rp83.783,90");
        // pending: 1_577_400 + 2_054_100 + 66_660 = 3_698_160
        assert_eq!(cards.total_pending, "Rp36.981,60");
    }

    #[tokio::test]
    async fn test_filtered_invoices_matches_name_case_insensitively() {
        let db = seeded_db().await;

        let rows = db
            .invoices()
            .fetch_filtered_invoices("LEE", 1)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.name == "Lee Robinson"));
    }

    #[tokio::test]
    async fn test_filtered_invoices_matches_amount_and_date_text() {
        let db = seeded_db().await;
        let service = db.invoices();

        // Amount digits, matched against the minor-unit text.
        let by_amount = service.fetch_filtered_invoices("4480000", 1).await.unwrap();
        assert_eq!(by_amount.len(), 1);
        assert_eq!(by_amount[0].amount.cents(), 4_480_000);

        // Date fragment.
        let by_date = service.fetch_filtered_invoices("2023-06", 1).await.unwrap();
        assert_eq!(by_date.len(), 2);
    }

    #[tokio::test]
    async fn test_filtered_invoices_pages_through_results() {
        let db = seeded_db().await;
        let service = db.invoices();

        // Empty query matches all 8 fixtures: 6 on page 1, 2 on page 2.
        let page1 = service.fetch_filtered_invoices("", 1).await.unwrap();
        let page2 = service.fetch_filtered_invoices("", 2).await.unwrap();
        assert_eq!(page1.len(), 6);
        assert_eq!(page2.len(), 2);

        // Newest first across the page boundary.
        assert!(page1[0].date > page1[5].date);
        assert!(page1[5].date > page2[0].date);
    }

    #[tokio::test]
    async fn test_invoices_pages_is_ceil_of_match_count() {
        let db = seeded_db().await;
        let service = db.invoices();

        // 8 matches / 6 per page → 2 pages.
        assert_eq!(service.fetch_invoices_pages("").await.unwrap(), 2);
        // 2 matches → 1 page.
        assert_eq!(service.fetch_invoices_pages("lee").await.unwrap(), 1);
        // No matches → 0 pages.
        assert_eq!(service.fetch_invoices_pages("zzz-no-match").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_invoice_by_id() {
        let db = seeded_db().await;
        let service = db.invoices();

        let form = service.fetch_invoice_by_id(&invoice_id("b3")).await.unwrap();
        assert_eq!(form.customer_id, CUSTOMER_LEE);
        assert_eq!(form.amount.cents(), 304_000);
        assert_eq!(form.status, InvoiceStatus::Paid);

        let missing = service.fetch_invoice_by_id("no-such-id").await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_filtered_reads_are_not_cached() {
        let db = seeded_db().await;

        db.invoices().fetch_filtered_invoices("lee", 1).await.unwrap();
        db.invoices().fetch_invoices_pages("lee").await.unwrap();

        assert_eq!(db.cache_stats().size, 0);
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_invoice_persists_and_is_dated_today() {
        let db = seeded_db().await;
        let service = db.invoices();

        let id = service
            .create_invoice(&input(CUSTOMER_DELBA, 12_500, InvoiceStatus::Pending))
            .await
            .unwrap();

        let form = service.fetch_invoice_by_id(&id).await.unwrap();
        assert_eq!(form.amount.cents(), 12_500);
        assert_eq!(form.status, InvoiceStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_invoice_rejects_invalid_input_before_io() {
        let db = seeded_db().await;
        let service = db.invoices();

        let err = service
            .create_invoice(&input(CUSTOMER_DELBA, 0, InvoiceStatus::Pending))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let err = service
            .create_invoice(&input("not-a-uuid", 100, InvoiceStatus::Paid))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 400);

        // Validation failures are recorded in the error log.
        assert_eq!(db.errors().stats().by_code.get("VALIDATION_ERROR"), Some(&2));
    }

    #[tokio::test]
    async fn test_create_invoice_unknown_customer_is_fk_violation() {
        let db = seeded_db().await;

        let err = db
            .invoices()
            .create_invoice(&input(
                // Valid UUID shape, but no such customer row.
                "9fd8efb1-64d4-4a3d-a1b1-07e4ec5022c9",
                100,
                InvoiceStatus::Paid,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation));
        assert_eq!(err.to_string(), "related record not found");
    }

    #[tokio::test]
    async fn test_update_invoice_changes_fields() {
        let db = seeded_db().await;
        let service = db.invoices();
        let id = invoice_id("b6");

        service
            .update_invoice(&id, &input(CUSTOMER_LEE, 70_000, InvoiceStatus::Paid))
            .await
            .unwrap();

        let form = service.fetch_invoice_by_id(&id).await.unwrap();
        assert_eq!(form.amount.cents(), 70_000);
        assert_eq!(form.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_update_missing_invoice_is_not_found() {
        let db = seeded_db().await;

        let err = db
            .invoices()
            .update_invoice(
                "59f0cbef-6a56-4460-9ec3-8a4d06f26dbd",
                &input(CUSTOMER_LEE, 100, InvoiceStatus::Paid),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_invoice_removes_row() {
        let db = seeded_db().await;
        let service = db.invoices();
        let id = invoice_id("b1");

        service.delete_invoice(&id).await.unwrap();

        assert!(service.fetch_invoice_by_id(&id).await.is_err());
        assert!(service.delete_invoice(&id).await.is_err());
    }

    // -------------------------------------------------------------------------
    // Cache invalidation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_mutations_invalidate_cached_aggregates() {
        let db = seeded_db().await;
        let service = db.invoices();

        // Prime both cached shapes.
        let cards_before = service.fetch_card_data().await.unwrap();
        let latest_before = service.fetch_latest_invoices().await.unwrap();
        assert_eq!(cards_before.invoice_count, 8);
        assert_eq!(latest_before.len(), 5);

        service
            .create_invoice(&input(CUSTOMER_DELBA, 999_900, InvoiceStatus::Pending))
            .await
            .unwrap();

        // Both keys were dropped: the next reads see the new row.
        let cards_after = service.fetch_card_data().await.unwrap();
        assert_eq!(cards_after.invoice_count, 9);

        let latest_after = service.fetch_latest_invoices().await.unwrap();
        // The new invoice is dated today, later than every fixture date.
        assert_eq!(latest_after[0].amount, "Rp9.999");
    }

    #[tokio::test]
    async fn test_delete_invalidates_cached_aggregates() {
        let db = seeded_db().await;
        let service = db.invoices();

        service.fetch_card_data().await.unwrap();
        service.delete_invoice(&invoice_id("b2")).await.unwrap();

        let cards = service.fetch_card_data().await.unwrap();
        assert_eq!(cards.invoice_count, 7);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_untouched() {
        let db = seeded_db().await;
        let service = db.invoices();

        service.fetch_card_data().await.unwrap();
        let primed = db.cache_stats().size;
        assert_eq!(primed, 1);

        // Validation failure: no I/O, no invalidation.
        let _ = service
            .create_invoice(&input(CUSTOMER_DELBA, -5, InvoiceStatus::Paid))
            .await;
        assert_eq!(db.cache_stats().size, 1);
    }
}
