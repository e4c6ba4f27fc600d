//! # Display Formatting
//!
//! Locale-aware currency and date formatting for the dashboard UI.
//!
//! ## The One Division Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Database      Services       Formatter          UI         │
//! │  ─────────     ─────────      ──────────         ───        │
//! │  4520000   ──► 4520000    ──► ÷ 100 = 45200  ──► "Rp45.200" │
//! │  (cents)       (cents)        (HERE, once)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//! Amounts stay in integer minor units everywhere else. This module is the
//! single place that divides by 100.
//!
//! ## Locales
//! The dashboard ships a small fixed registry: `id-ID`/`IDR` (default) and
//! `en-US`/`USD` (fallback). An unknown locale/currency pair falls back to
//! the fixed fallback pair rather than failing the render.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

// =============================================================================
// Locale Configuration
// =============================================================================

/// Default display locale.
pub const DEFAULT_LOCALE: &str = "id-ID";

/// Default display currency.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// Fallback locale when the requested one is unknown.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Fallback currency when the requested one is unknown.
pub const FALLBACK_CURRENCY: &str = "USD";

/// Fixed display timezone: UTC+7 (Asia/Jakarta, no DST).
const DISPLAY_TZ: FixedOffset = match FixedOffset::east_opt(7 * 3600) {
    Some(tz) => tz,
    None => unreachable!(),
};

/// Separator and symbol conventions for one locale/currency pair.
#[derive(Debug, Clone, Copy)]
struct CurrencyFormat {
    symbol: &'static str,
    thousands_sep: char,
    decimal_sep: char,
}

/// Conventions of the fixed fallback pair (`en-US`/`USD`).
const FALLBACK_FORMAT: CurrencyFormat = CurrencyFormat {
    symbol: "$",
    thousands_sep: ',',
    decimal_sep: '.',
};

/// Looks up the conventions for a locale/currency pair.
fn currency_format(locale: &str, currency: &str) -> Option<CurrencyFormat> {
    match (locale, currency) {
        ("id-ID", "IDR") => Some(CurrencyFormat {
            symbol: "Rp",
            thousands_sep: '.',
            decimal_sep: ',',
        }),
        ("en-US", "USD") => Some(FALLBACK_FORMAT),
        _ => None,
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Formats an amount of minor units as a localized currency string.
///
/// Fraction digits follow the UI convention: none when the minor part is
/// zero, two otherwise.
///
/// ## Example
/// ```rust
/// use acme_core::format::format_currency;
///
/// assert_eq!(format_currency(4_520_000, "id-ID", "IDR"), "Rp45.200");
/// assert_eq!(format_currency(1099, "en-US", "USD"), "$10.99");
///
/// // Unknown pair falls back to en-US/USD:
/// assert_eq!(format_currency(500, "fr-FR", "EUR"), "$5");
/// ```
pub fn format_currency(amount_cents: i64, locale: &str, currency: &str) -> String {
    let fmt = currency_format(locale, currency).unwrap_or(FALLBACK_FORMAT);

    let amount = Money::from_cents(amount_cents);
    let mut out = String::new();

    if amount.is_negative() {
        out.push('-');
    }
    out.push_str(fmt.symbol);
    push_grouped(&mut out, amount.major_units().unsigned_abs(), fmt.thousands_sep);

    let minor = amount.minor_part();
    if minor != 0 {
        out.push(fmt.decimal_sep);
        out.push_str(&format!("{:02}", minor));
    }

    out
}

/// Formats with the dashboard's default locale/currency pair.
pub fn format_currency_default(amount_cents: i64) -> String {
    format_currency(amount_cents, DEFAULT_LOCALE, DEFAULT_CURRENCY)
}

/// Appends `value` with a thousands separator every three digits.
fn push_grouped(out: &mut String, value: u64, sep: char) {
    let digits = value.to_string();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
}

// =============================================================================
// Date Formatting
// =============================================================================

/// Month rendering style. `Short` is the dashboard default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthStyle {
    #[default]
    Short,
    Long,
}

const MONTHS_EN_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_EN_LONG: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_ID_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];
const MONTHS_ID_LONG: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Formats a date string for display: day, short month, year, in the fixed
/// display timezone (UTC+7).
///
/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates. Unparseable input
/// is an error. An unknown locale falls back to the fixed fallback locale
/// without the timezone override.
///
/// ## Example
/// ```rust
/// use acme_core::format::format_date_to_local;
///
/// assert_eq!(format_date_to_local("2023-06-05", "id-ID").unwrap(), "5 Jun 2023");
/// assert_eq!(format_date_to_local("2023-06-05", "en-US").unwrap(), "Jun 5, 2023");
/// assert!(format_date_to_local("not-a-date", "id-ID").is_err());
/// ```
pub fn format_date_to_local(date_str: &str, locale: &str) -> ValidationResult<String> {
    format_date_with(date_str, locale, MonthStyle::Short)
}

/// Formats a date string with an explicit month style.
pub fn format_date_with(
    date_str: &str,
    locale: &str,
    month_style: MonthStyle,
) -> ValidationResult<String> {
    let known_locale = matches!(locale, "id-ID" | "en-US");

    // RFC 3339 timestamps shift into the display timezone before the date
    // is extracted; the fallback path skips the override.
    let date = if let Ok(instant) = DateTime::parse_from_rfc3339(date_str) {
        if known_locale {
            instant.with_timezone(&DISPLAY_TZ).date_naive()
        } else {
            instant.to_utc().date_naive()
        }
    } else {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            ValidationError::invalid_format("date", format!("'{}': {}", date_str, e))
        })?
    };

    let locale = if known_locale { locale } else { FALLBACK_LOCALE };
    Ok(render_date(date, locale, month_style))
}

fn render_date(date: NaiveDate, locale: &str, month_style: MonthStyle) -> String {
    let month_idx = date.month0() as usize;
    match locale {
        "id-ID" => {
            let month = match month_style {
                MonthStyle::Short => MONTHS_ID_SHORT[month_idx],
                MonthStyle::Long => MONTHS_ID_LONG[month_idx],
            };
            format!("{} {} {}", date.day(), month, date.year())
        }
        _ => {
            let month = match month_style {
                MonthStyle::Short => MONTHS_EN_SHORT[month_idx],
                MonthStyle::Long => MONTHS_EN_LONG[month_idx],
            };
            format!("{} {}, {}", month, date.day(), date.year())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
