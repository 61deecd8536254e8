//! # Validation Module
//!
//! Input validation for everything the pricing engine consumes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms                                              │
//! │  ├── Field masks, disabled inputs (e.g. tax-on-profit when profit = 0) │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities in [1, MAX_QUANTITY]                                   │
//! │  ├── Amounts in [0, MAX_UNIT_AMOUNT]                                   │
//! │  ├── Percentages in [0, 100]                                           │
//! │  └── Unique line ids                                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing engine (assumes validated input, never clamps)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use voltaje_core::validation::{validate_line_items, validate_modifiers};
//! use voltaje_core::{LineItem, Money, QuoteModifiers};
//!
//! let modifiers = QuoteModifiers::default();
//! let items = vec![LineItem::product("Tablero", 1, Money::from_units(450_000), &modifiers)];
//!
//! validate_modifiers(&modifiers).unwrap();
//! validate_line_items(&items).unwrap();
//! ```

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AiuRates, LineItem, Percent, QuoteModifiers};
use crate::{MAX_DESCRIPTION_LEN, MAX_QUANTITY, MAX_UNIT_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed `MAX_QUANTITY`
///
/// ## Example
/// ```rust
/// use voltaje_core::validation::validate_quantity;
///
/// assert!(validate_quantity("l1", 1).is_ok());
/// assert!(validate_quantity("l1", 0).is_err());
/// assert!(validate_quantity("l1", -3).is_err());
/// assert!(validate_quantity("l1", i64::MAX).is_err());
/// ```
pub fn validate_quantity(item_id: &str, quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::InvalidQuantity {
            item_id: item_id.to_string(),
            quantity,
        });
    }
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: format!("line {} quantity", item_id),
            max: Decimal::from(MAX_QUANTITY),
            value: Decimal::from(quantity),
        });
    }
    Ok(())
}

/// Validates a percentage.
///
/// ## Rules
/// - Between 0 and 100 inclusive
pub fn validate_percentage(field: &str, pct: Percent) -> ValidationResult<()> {
    let value = pct.value();
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::InvalidPercentage {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Validates a monetary amount.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items, courtesy labor)
/// - Must not exceed `MAX_UNIT_AMOUNT`
///
/// ## Example
/// ```rust
/// use voltaje_core::validation::validate_amount;
/// use voltaje_core::Money;
///
/// assert!(validate_amount("price", Money::from_units(0)).is_ok());
/// assert!(validate_amount("price", Money::from_units(-1)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
            value: amount.amount(),
        });
    }
    if amount.amount() > MAX_UNIT_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_UNIT_AMOUNT,
            value: amount.amount(),
        });
    }
    Ok(())
}

/// Validates a ratio such as the cost fallback (0.70).
///
/// ## Rules
/// - Between 0 and 1 inclusive
pub fn validate_ratio(field: &str, ratio: Decimal) -> ValidationResult<()> {
    if ratio < Decimal::ZERO || ratio > Decimal::ONE {
        return Err(ValidationError::InvalidRatio {
            field: field.to_string(),
            value: ratio,
        });
    }
    Ok(())
}

/// Validates a free-text description.
///
/// ## Rules
/// - At most `MAX_DESCRIPTION_LEN` characters (empty is allowed)
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the four AIU percentages, prefixing field names with `scope`.
pub fn validate_aiu(scope: &str, aiu: &AiuRates) -> ValidationResult<()> {
    validate_percentage(&format!("{} AIU admin", scope), aiu.admin)?;
    validate_percentage(&format!("{} AIU contingency", scope), aiu.contingency)?;
    validate_percentage(&format!("{} AIU profit", scope), aiu.profit)?;
    // Checked even when profit is zero: the value is inert but must be sane
    validate_percentage(&format!("{} tax on profit", scope), aiu.tax_on_profit)?;
    Ok(())
}

/// Validates quote-level modifiers.
pub fn validate_modifiers(modifiers: &QuoteModifiers) -> ValidationResult<()> {
    validate_percentage("global discount", modifiers.global_discount)?;
    validate_percentage("global tax", modifiers.global_tax)?;
    validate_aiu("quote", &modifiers.aiu)?;
    Ok(())
}

/// Validates one line: id, quantity, prices, AIU and kit contents.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "line item id".to_string(),
        });
    }
    validate_description(&item.description)?;
    validate_quantity(&item.id, item.quantity)?;
    validate_amount(&format!("line {} sale unit price", item.id), item.sale_unit_price)?;
    if let Some(cost) = item.supplier_unit_cost {
        validate_amount(&format!("line {} supplier unit cost", item.id), cost)?;
    }
    validate_aiu(&format!("line {}", item.id), &item.aiu)?;

    for sub in item.sub_items() {
        if sub.quantity < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: format!("line {} sub-item '{}' quantity", item.id, sub.name),
                value: sub.quantity,
            });
        }
        if sub.quantity > Decimal::from(MAX_QUANTITY) {
            return Err(ValidationError::TooLarge {
                field: format!("line {} sub-item '{}' quantity", item.id, sub.name),
                max: Decimal::from(MAX_QUANTITY),
                value: sub.quantity,
            });
        }
        validate_amount(
            &format!("line {} sub-item '{}' unit price", item.id, sub.name),
            sub.unit_price,
        )?;
    }
    Ok(())
}

/// Validates every line and checks that ids are unique.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        validate_line_item(item)?;
        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "line item id".to_string(),
                value: item.id.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
