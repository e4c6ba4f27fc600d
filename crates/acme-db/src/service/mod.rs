//! # Dashboard Services
//!
//! The orchestration layer: cache-or-query reads, retried + invalidating
//! writes, result shaping.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  caller ──► service.fetch_*()                               │
//! │                 │                                           │
//! │                 ├── cache hit?  ──► return (no I/O)         │
//! │                 │                                           │
//! │                 ▼ miss                                      │
//! │             run query ──► shape (join, format currency)     │
//! │                 │                                           │
//! │                 ▼                                           │
//! │             cache.set(key) ──► return                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Path
//! ```text
//! validate ──► with_retry(mutation) ──► invalidate
//!    │              │                   invoices,
//!    │ invalid      │ exhausted         invoices_latest,
//!    ▼              ▼                   card-data
//!  error          classified error
//!  (no I/O)      (cache untouched)
//! ```

pub mod customer;
pub mod invoice;
pub mod revenue;

pub use customer::CustomerService;
pub use invoice::InvoiceService;
pub use revenue::RevenueService;

use crate::diagnostics::ErrorLog;
use crate::error::DbError;

/// Records a failure in the error log and hands it back for propagation.
/// Services never swallow an error; they observe it and re-raise.
pub(crate) fn log_failure(errors: &ErrorLog, operation: &str, err: DbError) -> DbError {
    errors.record(operation, &err);
    err
}

// =============================================================================
// Test Fixtures
// =============================================================================
