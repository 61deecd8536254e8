//! # voltaje-core: Pure Business Logic for Voltaje ERP
//!
//! This crate is the **heart** of Voltaje ERP, the back office of a small
//! electrical contracting company. It prices quotes and answers the
//! threshold questions the dashboard asks, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Voltaje ERP Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Browser UI / voltaje-quote CLI                         │   │
//! │  │    Quote builder ──► Work-order editor ──► Dashboard           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    voltaje-store                                │   │
//! │  │    QuoteService, DashboardKpis, capability traits              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ voltaje-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ work_code │  │ classify  │  │   │
//! │  │   │   Quote   │  │  Mode A   │  │   APU     │  │  stock    │  │   │
//! │  │   │ LineItem  │  │  Mode B   │  │  catalog  │  │  expiry   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Quote, LineItem, modifiers, inventory, documents)
//! - [`money`] - Exact decimal Money and display formatting
//! - [`pricing`] - The two AIU pricing strategies
//! - [`work_code`] - Work-code (APU) catalogs and material requirements
//! - [`classify`] - Stock and expiration thresholds
//! - [`payroll`] - Employee payroll deductions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; `now` is always a parameter
//! 2. **No I/O**: database, network and file system access are FORBIDDEN here
//! 3. **Exact Money**: `Decimal` end to end, rounded only for display
//! 4. **Explicit Errors**: bad input is rejected with a typed error, never clamped
//!
//! ## Example Usage
//!
//! ```rust
//! use voltaje_core::pricing::{compute_totals, PricingMode, PricingPolicy};
//! use voltaje_core::{LineItem, Money, Percent, QuoteModifiers};
//!
//! let mut modifiers = QuoteModifiers::default();
//! modifiers.aiu.profit = Percent::from_units(10);
//!
//! let items = vec![LineItem::service("Acometida trifásica", 1, Money::from_units(1_000_000), &modifiers)];
//! let totals = compute_totals(&items, &modifiers, PricingMode::QuoteLevelAiu, &PricingPolicy::default()).unwrap();
//!
//! assert_eq!(totals.grand_total.to_string(), "$ 1.309.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classify;
pub mod error;
pub mod money;
pub mod payroll;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod work_code;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use voltaje_core::Money` instead of
// `use voltaje_core::money::Money`

pub use classify::{ExpirationStatus, StockStatus};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use pricing::{
    compute_totals, CostFallback, LineBreakdown, PricingMode, PricingPolicy, Totals,
    DEFAULT_COST_FALLBACK_RATIO,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Colombian standard VAT rate, used as the default global tax.
pub const DEFAULT_VAT_PCT: u32 = 19;

/// VAT charged on the profit component of AIU contracts.
pub const DEFAULT_TAX_ON_PROFIT_PCT: u32 = 19;

/// Largest unit price, cost or gross pay accepted (one trillion pesos).
///
/// ## Business Reason
/// Together with [`MAX_QUANTITY`] this keeps every product the engine forms
/// far inside `Decimal`'s 96-bit range, so pricing cannot overflow.
pub const MAX_UNIT_AMOUNT: rust_decimal::Decimal = rust_decimal_macros::dec!(1000000000000);

/// Largest line or kit quantity accepted.
pub const MAX_QUANTITY: i64 = 100_000;

/// Maximum characters in a line description
///
/// ## Business Reason
/// Descriptions are printed in a single table column of the quote PDF.
pub const MAX_DESCRIPTION_LEN: usize = 200;
