//! # Domain Types
//!
//! Core domain types used throughout the Acme Dashboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Domain Types                           │
//! │                                                             │
//! │  Persisted                    Shaped (derived, never        │
//! │  ─────────                    persisted)                    │
//! │  Invoice                      ──────────────────────        │
//! │  Customer                     LatestInvoice                 │
//! │  RevenuePoint                 InvoiceRow                    │
//! │                               CardData                      │
//! │  Input                        CustomerSummary               │
//! │  ─────                        InvoiceForm                   │
//! │  InvoiceInput                                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shaped types carry pre-formatted currency strings; everything else keeps
//! amounts as [`Money`] minor units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Invoice Status
// =============================================================================

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    Pending,
    /// Payment received.
    Paid,
}

impl InvoiceStatus {
    /// All status values accepted on the write path.
    pub const ALL: &'static [&'static str] = &["pending", "paid"];

    /// Returns the database/text representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: InvoiceStatus::ALL.to_vec(),
            }),
        }
    }
}

// =============================================================================
// Persisted Entities
// =============================================================================

/// An invoice as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning customer (foreign key).
    pub customer_id: String,

    /// Amount in minor units.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "amount_cents"))]
    pub amount: Money,

    /// Payment status.
    pub status: InvoiceStatus,

    /// Invoice date.
    pub date: NaiveDate,
}

/// A customer as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Avatar image path.
    pub image_url: String,
}

/// One month of the revenue time series. Independent of invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RevenuePoint {
    /// Month label, e.g. "Jan".
    pub month: String,

    /// Revenue for the month in minor units.
    pub revenue: i64,
}

// =============================================================================
// Shaped Results (derived, never persisted)
// =============================================================================

/// Dashboard row for the "latest invoices" card. Amount is pre-formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Locale-formatted amount, e.g. "Rp 4.500".
    pub amount: String,
}

/// One row of the filtered invoices table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceRow {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "amount_cents"))]
    pub amount: Money,
    pub status: InvoiceStatus,
}

/// Aggregate figures for the dashboard summary cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardData {
    pub customer_count: i64,
    pub invoice_count: i64,
    /// Locale-formatted sum of paid invoices.
    pub total_paid: String,
    /// Locale-formatted sum of pending invoices.
    pub total_pending: String,
}

/// One row of the customers table, with per-customer invoice totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    /// Locale-formatted pending total.
    pub total_pending: String,
    /// Locale-formatted paid total.
    pub total_paid: String,
}

/// Invoice shape consumed by the edit form.
///
/// The amount stays in minor units; display conversion belongs to
/// [`crate::format::format_currency`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceForm {
    pub id: String,
    pub customer_id: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "amount_cents"))]
    pub amount: Money,
    pub status: InvoiceStatus,
}

// =============================================================================
// Write-Path Input
// =============================================================================

/// Caller-supplied fields for creating or updating an invoice.
///
/// Validated by [`crate::validation::validate_invoice_input`] before any I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceInput {
    pub customer_id: String,

    /// Amount in minor units.
    pub amount_cents: i64,

    pub status: InvoiceStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================
