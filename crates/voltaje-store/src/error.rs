//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (pricing, lifecycle, validation)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds missing/duplicate record cases        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError / UI ← Printed for the operator                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use voltaje_core::{CoreError, QuoteStatus};

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Record not found.
    ///
    /// ## When This Occurs
    /// - Quote id doesn't exist
    /// - Stock adjustment for an unknown SKU
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique key already taken.
    ///
    /// ## When This Occurs
    /// - Inserting a quote whose id or number already exists
    /// - Inserting a document id twice
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A conditional write found the record in another status.
    ///
    /// ## When This Occurs
    /// - Two status changes raced; the loser sees the winner's status
    /// - A draft was sent while an edit of it was being saved
    #[error("Quote {id} changed concurrently: expected {expected}, found {found}")]
    StatusConflict {
        id: String,
        expected: QuoteStatus,
        found: QuoteStatus,
    },

    /// Business rule failure from voltaje-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            StoreError::not_found("Quote", "q-1").to_string(),
            "Quote not found: q-1"
        );
        assert_eq!(
            StoreError::duplicate("quote number", "COT-0001").to_string(),
            "Duplicate quote number: 'COT-0001' already exists"
        );

        let conflict = StoreError::StatusConflict {
            id: "q-1".to_string(),
            expected: QuoteStatus::Sent,
            found: QuoteStatus::Approved,
        };
        assert_eq!(
            conflict.to_string(),
            "Quote q-1 changed concurrently: expected sent, found approved"
        );

        let core = CoreError::LineItemNotFound("l1".to_string());
        assert_eq!(StoreError::from(core).to_string(), "Line item not found: l1");
    }
}
