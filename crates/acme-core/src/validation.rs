//! # Validation Module
//!
//! Input validation for the invoice write path and search inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Validation Layers                         │
//! │                                                             │
//! │  Layer 1: THIS MODULE - field shape and range checks,       │
//! │           before any I/O (a ValidationError never retries)  │
//! │           │                                                 │
//! │           ▼                                                 │
//! │  Layer 2: Database (SQLite)                                 │
//! │           NOT NULL / UNIQUE / FOREIGN KEY constraints       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use acme_core::validation::{validate_amount_cents, validate_customer_id};
//!
//! validate_customer_id("3958dc9e-712f-4377-85e9-fec4b6a6442a").unwrap();
//! validate_amount_cents(4500).unwrap();
//! assert!(validate_amount_cents(0).is_err());
//! ```

use uuid::Uuid;

use crate::error::{ValidationError, ValidationResult};
use crate::types::InvoiceInput;
use crate::{MAX_INVOICE_AMOUNT_CENTS, MAX_QUERY_LENGTH};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a customer id reference.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a UUID
pub fn validate_customer_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_id".to_string(),
        });
    }

    if Uuid::parse_str(id).is_err() {
        return Err(ValidationError::invalid_format(
            "customer_id",
            "must be a UUID",
        ));
    }

    Ok(())
}

/// Validates an invoice amount in minor units.
///
/// ## Rules
/// - Must be positive (zero-amount invoices are rejected)
/// - Must not exceed [`MAX_INVOICE_AMOUNT_CENTS`]
pub fn validate_amount_cents(amount_cents: i64) -> ValidationResult<()> {
    if amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if amount_cents > MAX_INVOICE_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_INVOICE_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates a free-text search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Must not exceed [`MAX_QUERY_LENGTH`] characters
/// - Must not contain control characters
pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LENGTH,
        });
    }

    if query.chars().any(char::is_control) {
        return Err(ValidationError::invalid_format(
            "query",
            "must not contain control characters",
        ));
    }

    Ok(())
}

/// Validates an email address structurally: one `@`, non-empty local part,
/// and a domain containing a dot.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    let local_ok = !local.is_empty() && !local.chars().any(char::is_whitespace);
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.chars().any(char::is_whitespace);

    if !local_ok || !domain_ok {
        return Err(ValidationError::invalid_format(
            "email",
            "must look like name@domain.tld",
        ));
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of an invoice create/update payload.
///
/// Returns the first failure; callers surface one error at a time, matching
/// the form UI.
pub fn validate_invoice_input(input: &InvoiceInput) -> ValidationResult<()> {
    validate_customer_id(&input.customer_id)?;
    validate_amount_cents(input.amount_cents)?;
    // `status` is already a typed enum; deserialization rejects anything
    // outside the allowed set.
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceStatus;

    #[test]
    fn test_customer_id() {
        assert!(validate_customer_id("3958dc9e-712f-4377-85e9-fec4b6a6442a").is_ok());
        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("   ").is_err());
        assert!(validate_customer_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_amount() {
        assert!(validate_amount_cents(1).is_ok());
        assert!(validate_amount_cents(4_500_000).is_ok());
        assert!(validate_amount_cents(0).is_err());
        assert!(validate_amount_cents(-100).is_err());
        assert!(validate_amount_cents(MAX_INVOICE_AMOUNT_CENTS + 1).is_err());
    }

    #[test]
    fn test_search_query() {
        assert!(validate_search_query("").is_ok());
        assert!(validate_search_query("lee").is_ok());
        assert!(validate_search_query(&"x".repeat(MAX_QUERY_LENGTH)).is_ok());
        assert!(validate_search_query(&"x".repeat(MAX_QUERY_LENGTH + 1)).is_err());
        assert!(validate_search_query("a\0b").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("delba@oliveira.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@signs.com").is_err());
        assert!(validate_email("name@nodot").is_err());
        assert!(validate_email("name@.leading-dot.com").is_err());
    }

    #[test]
    fn test_invoice_input() {
        let good = InvoiceInput {
            customer_id: "3958dc9e-712f-4377-85e9-fec4b6a6442a".to_string(),
            amount_cents: 4500,
            status: InvoiceStatus::Pending,
        };
        assert!(validate_invoice_input(&good).is_ok());

        let bad_amount = InvoiceInput {
            amount_cents: 0,
            ..good.clone()
        };
        assert!(validate_invoice_input(&bad_amount).is_err());

        let bad_customer = InvoiceInput {
            customer_id: "nope".to_string(),
            ..good
        };
        assert!(validate_invoice_input(&bad_customer).is_err());
    }
}
