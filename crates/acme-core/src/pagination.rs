//! # Pagination Windower
//!
//! Computes the compressed page-number list shown by the pager UI.
//!
//! ## Window Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  totalPages ≤ 7        [1][2][3][4][5][6][7]                │
//! │                                                             │
//! │  current ≤ 3           [1][2][3] … [9][10]                  │
//! │  current ≥ total-2     [1][2] … [8][9][10]                  │
//! │  otherwise             [1] … [4][5][6] … [10]               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//! Page 1 and the last page are always visible; at most one ellipsis marker
//! appears on each side of the middle block.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MAX_PAGES_SHOWN;

// =============================================================================
// Page Item
// =============================================================================

/// One slot in the pager: a concrete page number or an ellipsis marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

// =============================================================================
// Window Computation
// =============================================================================

/// Computes the pager window for `current_page` of `total_pages`.
///
/// Out-of-range input (`current_page < 1` or `total_pages < 1`) yields an
/// empty window rather than an error; the pager simply renders nothing.
///
/// ## Example
/// ```rust
/// use acme_core::pagination::{generate_pagination, PageItem};
///
/// let window = generate_pagination(5, 10);
/// assert_eq!(window[0], PageItem::Page(1));
/// assert_eq!(window[1], PageItem::Ellipsis);
/// ```
pub fn generate_pagination(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages == 0 || current_page == 0 {
        return Vec::new();
    }

    if total_pages <= MAX_PAGES_SHOWN {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    use PageItem::{Ellipsis, Page};

    if current_page <= 3 {
        // First 3 pages, ellipsis, last 2 pages.
        vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ]
    } else if current_page >= total_pages - 2 {
        // First 2 pages, ellipsis, last 3 pages.
        vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ]
    } else {
        // First page, ellipsis, current±1, ellipsis, last page.
        vec![
            Page(1),
            Ellipsis,
            Page(current_page - 1),
            Page(current_page),
            Page(current_page + 1),
            Ellipsis,
            Page(total_pages),
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
