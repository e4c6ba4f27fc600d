//! # acme-db: Data Access Layer for the Acme Dashboard
//!
//! This crate owns every interaction with storage for the dashboard: the
//! SQLite pool, embedded migrations, the in-process TTL cache, the retry
//! wrapper, the error-log ring buffer, and the revenue/invoice/customer
//! services.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Acme Dashboard Data Flow                   │
//! │                                                             │
//! │  Web layer (fetch_filtered_invoices, create_invoice, ...)   │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │                acme-db (THIS CRATE)                 │   │
//! │  │                                                     │   │
//! │  │   ┌─────────┐  ┌────────┐  ┌────────┐  ┌────────┐  │   │
//! │  │   │Database │  │ Cache  │  │ retry  │  │ErrorLog│  │   │
//! │  │   │(pool.rs)│  │ (TTL)  │  │wrapper │  │ (ring) │  │   │
//! │  │   └────┬────┘  └───┬────┘  └───┬────┘  └───┬────┘  │   │
//! │  │        └───────────┴─────┬─────┴───────────┘       │   │
//! │  │                          ▼                          │   │
//! │  │     RevenueService  InvoiceService  CustomerService │   │
//! │  └──────────────────────────┬──────────────────────────┘   │
//! │                             ▼                              │
//! │                     SQLite Database                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`cache`] - TTL cache with lazy expiry
//! - [`retry`] - Exponential-backoff retry for mutations
//! - [`diagnostics`] - Bounded error-log ring buffer
//! - [`error`] - Database error types
//! - [`service`] - Revenue, invoice, and customer services
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acme_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/dashboard.db")).await?;
//!
//! let revenue = db.revenue().fetch_revenue().await?;
//! let cards = db.invoices().fetch_card_data().await?;
//! let page = db.invoices().fetch_filtered_invoices("lee", 1).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod diagnostics;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod retry;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{Cache, CacheStats};
pub use diagnostics::{ErrorLog, ErrorStats};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use retry::{with_retry, DEFAULT_RETRY_ATTEMPTS};

// Service re-exports for convenience
pub use service::{CustomerService, InvoiceService, RevenueService};
