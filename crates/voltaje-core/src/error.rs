//! # Error Types
//!
//! Domain-specific error types for voltaje-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  voltaje-core errors (this file)                                       │
//! │  ├── CoreError        - Pricing, work-code and lifecycle failures      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  voltaje-store errors (separate crate)                                 │
//! │  └── StoreError       - Missing/duplicate records                      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError / CliError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, field, offending value)
//! 3. Errors are enum variants, never String
//! 4. Invalid input is rejected, never clamped into a "valid" total

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::QuoteStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Per-line AIU pricing needs a cost basis and the line has none.
    ///
    /// ## When This Occurs
    /// - `supplier_unit_cost` is absent
    /// - The pricing policy has the sale-price fallback disabled
    #[error("Line {item_id} has no supplier cost and no cost fallback is configured")]
    MissingCostBasis { item_id: String },

    /// A work code references a code that is not in the catalog.
    #[error("Work code {parent} references unknown work code {missing}")]
    UnknownWorkCode { parent: String, missing: String },

    /// Work codes reference each other in a loop.
    ///
    /// `path` lists the codes around the cycle, starting and ending with the
    /// same code (e.g. `["A", "B", "A"]`).
    #[error("Work codes form a cycle: {}", path.join(" -> "))]
    CyclicWorkCode { path: Vec<String> },

    /// Lookup of a work code that does not exist.
    #[error("Work code not found: {0}")]
    WorkCodeNotFound(String),

    /// The quote cannot move from its current status to the requested one.
    #[error("Quote {quote_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        quote_id: String,
        from: QuoteStatus,
        to: QuoteStatus,
    },

    /// Items and modifiers can only change while the quote is a draft.
    #[error("Quote {quote_id} is {status} and can no longer be edited")]
    QuoteNotEditable { quote_id: String, status: QuoteStatus },

    /// A computation left `Decimal`'s range.
    ///
    /// ## When This Occurs
    /// - Work-code quantities multiplied through many nested levels
    /// - Aggregating material requirements of enormous kits
    #[error("Amount overflow while {context}")]
    AmountOverflow { context: String },

    /// Line item not present in the quote.
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any arithmetic runs so that a bad field never
/// turns into a silently wrong total.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Line quantity below 1.
    #[error("Line {item_id}: quantity must be at least 1, got {quantity}")]
    InvalidQuantity { item_id: String, quantity: i64 },

    /// Percentage outside the closed range [0, 100].
    #[error("{field} must be between 0 and 100, got {value}")]
    InvalidPercentage { field: String, value: Decimal },

    /// Monetary amount or quantity that must not be negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    /// Ratio outside the closed range [0, 1].
    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRatio { field: String, value: Decimal },

    /// Amount or quantity above the accepted maximum.
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: String,
        max: Decimal,
        value: Decimal,
    },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., unknown status name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Duplicate value (e.g., two lines sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
