//! # acme-core: Pure Business Logic for the Acme Dashboard
//!
//! Everything in this crate is a deterministic function of its inputs:
//! money arithmetic, currency and date formatting, pagination windowing,
//! chart axis scaling, and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Acme Dashboard Architecture                 │
//! │                                                             │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │                  Web / UI layer                     │   │
//! │  │     dashboard cards, invoice table, pager, chart    │   │
//! │  └─────────────────────────┬───────────────────────────┘   │
//! │                            │                               │
//! │  ┌─────────────────────────▼───────────────────────────┐   │
//! │  │              acme-db (services + cache)             │   │
//! │  └─────────────────────────┬───────────────────────────┘   │
//! │                            │                               │
//! │  ┌─────────────────────────▼───────────────────────────┐   │
//! │  │            ★ acme-core (THIS CRATE) ★               │   │
//! │  │                                                     │   │
//! │  │   ┌────────┐ ┌────────┐ ┌────────────┐ ┌────────┐  │   │
//! │  │   │ money  │ │ format │ │ pagination │ │ chart  │  │   │
//! │  │   └────────┘ └────────┘ └────────────┘ └────────┘  │   │
//! │  │                                                     │   │
//! │  │   NO I/O • NO DATABASE • NO STATE • PURE FUNCTIONS  │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, Customer, RevenuePoint, shaped rows)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`format`] - Locale-aware currency and date display formatting
//! - [`pagination`] - Compressed page-number windows for the pager UI
//! - [`chart`] - Y-axis tick labels for the revenue chart
//! - [`validation`] - Input validation for the invoice write path
//! - [`error`] - Domain error types
//!
//! ## Example
//!
//! ```rust
//! use acme_core::format::format_currency;
//! use acme_core::pagination::{generate_pagination, PageItem};
//!
//! // Amounts are integer minor units; division by 100 happens here,
//! // at the display boundary, and nowhere else.
//! assert_eq!(format_currency(1099, "en-US", "USD"), "$10.99");
//!
//! // Seven pages or fewer: the pager shows every page.
//! let window = generate_pagination(2, 5);
//! assert_eq!(window.len(), 5);
//! assert_eq!(window[0], PageItem::Page(1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod chart;
pub mod error;
pub mod format;
pub mod money;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed page size for invoice listings.
pub const ITEMS_PER_PAGE: u32 = 6;

/// Maximum number of page buttons shown before the pager compresses the
/// window with ellipsis markers.
pub const MAX_PAGES_SHOWN: u32 = 7;

/// Upper bound on a single invoice amount, in minor units (one billion in
/// major units). Guards against fat-fingered form input.
pub const MAX_INVOICE_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Maximum accepted length of a free-text search query.
pub const MAX_QUERY_LENGTH: usize = 100;
