//! # Database Error Types
//!
//! Error types for the data-access layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Error Propagation                         │
//! │                                                             │
//! │  SQLite Error (sqlx::Error)                                 │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  DbError (this module) ← classifies constraint failures,    │
//! │       │                  names the failing operation        │
//! │       ▼                                                     │
//! │  ErrorPayload { code, status, message } ← what the web      │
//! │       │                                   layer serializes  │
//! │       ▼                                                     │
//! │  Caller displays a user-friendly message                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! One tagged sum type instead of an inheritance hierarchy: callers match on
//! the variant, the HTTP layer reads `code()`/`status()`.

use serde::Serialize;
use thiserror::Error;

use acme_core::ValidationError;

// =============================================================================
// DbError
// =============================================================================

/// Data-access errors.
///
/// Four user-visible kinds (validation, not-found, unauthorized, database),
/// with database failures split into variants that carry their specific
/// user-facing message.
#[derive(Debug, Error)]
pub enum DbError {
    /// Caller-supplied input failed validation. Never retried.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced entity absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Access denied. Declared for the API surface; no data-layer operation
    /// currently performs an access check.
    #[error("access denied")]
    Unauthorized,

    /// Unique constraint violation, e.g. duplicate customer email.
    #[error("{field} already exists")]
    UniqueViolation { field: String },

    /// Foreign key violation, e.g. invoice pointing at a missing customer.
    #[error("related record not found")]
    ForeignKeyViolation,

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Any other query failure, tagged with the operation that ran it.
    #[error("database error in {operation}: {message}")]
    QueryFailed { operation: String, message: String },
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Classifies a raw sqlx failure from the named operation.
    ///
    /// ## Classification
    /// ```text
    /// UNIQUE constraint failed  → UniqueViolation ("already exists")
    /// FOREIGN KEY ... failed    → ForeignKeyViolation ("related record
    ///                             not found")
    /// RowNotFound               → NotFound
    /// anything else             → QueryFailed naming the operation
    /// ```
    pub fn query(operation: impl Into<String>, err: sqlx::Error) -> Self {
        let operation = operation.into();
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("record")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation
                } else {
                    DbError::QueryFailed {
                        operation,
                        message: msg.to_string(),
                    }
                }
            }

            sqlx::Error::PoolTimedOut => DbError::ConnectionFailed("pool exhausted".to_string()),
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            other => DbError::QueryFailed {
                operation,
                message: other.to_string(),
            },
        }
    }

    /// Stable machine-readable code, one per user-visible error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DbError::Validation(_) => "VALIDATION_ERROR",
            DbError::NotFound { .. } => "NOT_FOUND",
            DbError::Unauthorized => "UNAUTHORIZED",
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation
            | DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed { .. } => "DATABASE_ERROR",
        }
    }

    /// HTTP-style status for presentation.
    pub fn status(&self) -> u16 {
        match self {
            DbError::Validation(_) => 400,
            DbError::NotFound { .. } => 404,
            DbError::Unauthorized => 401,
            _ => 500,
        }
    }

    /// The serializable shape handed to the web layer.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            status: self.status(),
            message: self.to_string(),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

// =============================================================================
// Error Payload
// =============================================================================

/// Flattened error shape for serialization across the API boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub status: u16,
    pub message: String,
}

/// Result type for data-access operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        let err: DbError = ValidationError::Required {
            field: "customer_id".to_string(),
        }
        .into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), 400);

        let err = DbError::not_found("Invoice", "abc");
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Invoice not found: abc");

        assert_eq!(DbError::Unauthorized.status(), 401);

        let err = DbError::QueryFailed {
            operation: "fetch_revenue".to_string(),
            message: "disk I/O error".to_string(),
        };
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("fetch_revenue"));
    }

    #[test]
    fn test_constraint_messages() {
        let err = DbError::UniqueViolation {
            field: "customers.email".to_string(),
        };
        assert_eq!(err.to_string(), "customers.email already exists");

        assert_eq!(
            DbError::ForeignKeyViolation.to_string(),
            "related record not found"
        );
    }

    #[test]
    fn test_payload_shape() {
        let payload = DbError::not_found("Customer", "c-1").payload();
        assert_eq!(payload.code, "NOT_FOUND");
        assert_eq!(payload.status, 404);
        assert!(payload.message.contains("Customer"));
    }

    #[test]
    fn test_query_classifier_row_not_found() {
        let err = DbError::query("fetch_invoice_by_id", sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
