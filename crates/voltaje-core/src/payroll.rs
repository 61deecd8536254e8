//! # Payroll Deductions
//!
//! Employee-side social security contributions withheld from gross pay.
//!
//! ```text
//! gross ──┬── health  (4%)
//!         ├── pension (4%)
//!         └── net = gross − health − pension
//! ```
//!
//! Employer contributions and parafiscales are not modelled.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percent;
use crate::validation::{validate_amount, validate_percentage, ValidationResult};

/// Default employee health contribution (percent of gross).
pub const DEFAULT_HEALTH_PCT: u32 = 4;

/// Default employee pension contribution (percent of gross).
pub const DEFAULT_PENSION_PCT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRates {
    pub health: Percent,
    pub pension: Percent,
}

impl Default for PayrollRates {
    fn default() -> Self {
        PayrollRates {
            health: Percent::from_units(DEFAULT_HEALTH_PCT),
            pension: Percent::from_units(DEFAULT_PENSION_PCT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayrollBreakdown {
    pub gross: Money,
    pub health: Money,
    pub pension: Money,
    pub total_deductions: Money,
    pub net: Money,
}

/// Splits `gross` into deductions and net pay.
///
/// ## Example
/// ```rust
/// use voltaje_core::payroll::{compute_payroll, PayrollRates};
/// use voltaje_core::Money;
///
/// let slip = compute_payroll(Money::from_units(2_000_000), &PayrollRates::default()).unwrap();
/// assert_eq!(slip.health, Money::from_units(80_000));
/// assert_eq!(slip.net, Money::from_units(1_840_000));
/// ```
pub fn compute_payroll(gross: Money, rates: &PayrollRates) -> ValidationResult<PayrollBreakdown> {
    validate_amount("gross pay", gross)?;
    validate_percentage("health contribution", rates.health)?;
    validate_percentage("pension contribution", rates.pension)?;

    let health = rates.health.of(gross);
    let pension = rates.pension.of(gross);
    let total_deductions = health + pension;

    if total_deductions > gross {
        return Err(ValidationError::InvalidFormat {
            field: "payroll rates".to_string(),
            reason: format!("deductions of {} exceed gross pay", rates.health.value() + rates.pension.value()),
        });
    }

    Ok(PayrollBreakdown {
        gross,
        health,
        pension,
        total_deductions,
        net: gross - total_deductions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rates() {
        let slip = compute_payroll(Money::from_units(1_300_000), &PayrollRates::default()).unwrap();
        assert_eq!(slip.health, Money::from_units(52_000));
        assert_eq!(slip.pension, Money::from_units(52_000));
        assert_eq!(slip.total_deductions, Money::from_units(104_000));
        assert_eq!(slip.net, slip.gross - slip.total_deductions);
    }

    #[test]
    fn test_zero_gross() {
        let slip = compute_payroll(Money::zero(), &PayrollRates::default()).unwrap();
        assert!(slip.net.is_zero());
    }

    #[test]
    fn test_fractional_result_is_not_rounded() {
        let slip = compute_payroll(Money::from_units(1_234_567), &PayrollRates::default()).unwrap();
        assert_eq!(slip.health, Money::new(dec!(49382.68)));
        assert_eq!(slip.net, Money::new(dec!(1135801.64)));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            compute_payroll(Money::from_units(-1), &PayrollRates::default()),
            Err(ValidationError::NegativeAmount { .. })
        ));

        let rates = PayrollRates {
            health: Percent::from_units(101),
            pension: Percent::zero(),
        };
        assert!(matches!(
            compute_payroll(Money::from_units(100), &rates),
            Err(ValidationError::InvalidPercentage { .. })
        ));

        let rates = PayrollRates {
            health: Percent::from_units(60),
            pension: Percent::from_units(60),
        };
        assert!(compute_payroll(Money::from_units(100), &rates).is_err());
    }
}
