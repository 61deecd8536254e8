//! # Threshold Classifiers
//!
//! Stock-level and document-expiration status used by the dashboard KPIs.
//!
//! ```text
//! Stock (current vs min)              Expiration (days left, rounded up)
//! ───────────────────────             ──────────────────────────────────
//! current ≤ min      → CRITICAL       days < 0   → EXPIRED
//! current ≤ 2 × min  → WARNING        days < 30  → EXPIRING_SOON
//! otherwise          → OK             otherwise  → OK
//! ```
//!
//! Both classifiers are pure: the caller passes `now` explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Milliseconds in a day; the expiration window counts in whole days.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Documents expiring in fewer days than this are flagged.
pub const EXPIRING_SOON_DAYS: i64 = 30;

// =============================================================================
// Expiration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationStatus {
    Expired,
    ExpiringSoon,
    Ok,
}

/// Days from `now` until `expires_at`, rounded toward positive infinity.
///
/// An expiry one millisecond in the past yields 0, one full day in the past
/// yields -1.
pub fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expires_at - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Classifies an already computed day count.
pub fn classify_days_left(days_left: i64) -> ExpirationStatus {
    if days_left < 0 {
        ExpirationStatus::Expired
    } else if days_left < EXPIRING_SOON_DAYS {
        ExpirationStatus::ExpiringSoon
    } else {
        ExpirationStatus::Ok
    }
}

/// Classifies a document expiring at `expires_at` as seen at `now`.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use voltaje_core::classify::{classify_expiration, ExpirationStatus};
///
/// let now = Utc::now();
/// assert_eq!(
///     classify_expiration(now + Duration::days(10), now),
///     ExpirationStatus::ExpiringSoon
/// );
/// ```
pub fn classify_expiration(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> ExpirationStatus {
    classify_days_left(days_until(expires_at, now))
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Critical,
    Warning,
    Ok,
}

/// Classifies a stock level against its reorder minimum.
pub fn classify_stock(current_qty: i64, min_qty: i64) -> StockStatus {
    if current_qty <= min_qty {
        StockStatus::Critical
    } else if current_qty <= min_qty.saturating_mul(2) {
        StockStatus::Warning
    } else {
        StockStatus::Ok
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
