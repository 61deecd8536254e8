//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE COMPOUNDING PROBLEM                                                │
//! │                                                                         │
//! │  A quote total is a chain of percentages:                               │
//! │    subtotal → discount → admin/contingency/profit → VAT on profit       │
//! │                                                                         │
//! │  Rounding each step to whole pesos drifts the grand total away from     │
//! │  the figure the client computes on paper. Binary floats drift too:      │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Exact decimals end to end                                │
//! │    Every intermediate keeps its full precision.                         │
//! │    Only `Money::format` rounds, once, at the presentation boundary.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use voltaje_core::money::Money;
//!
//! let price = Money::from_units(125_000);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.amount(), dec!(375000));
//!
//! // Rounding happens only here
//! assert_eq!(Money::new(dec!(1309000.4)).to_string(), "$ 1.309.000");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the quote currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact base-10 arithmetic; the sign is kept so that
///   differences can be represented, but validation rejects negative inputs
/// - **Single field tuple struct**: zero-cost wrapper, serializes as a string
/// - **No rounding**: arithmetic never rounds; see [`Money::format`]
///
/// ## Where Money is Used
/// ```text
/// LineItem.sale_unit_price ──► LineBreakdown.line_total ──► Totals.subtotal
///                                                                │
/// Totals.discount/aiu/tax ◄──────────────────────────────────────┘
///        │
///        └──► Totals.grand_total ──► "$ 1.309.000" in the summary panel
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates an amount from whole currency units (pesos).
    ///
    /// ## Example
    /// ```rust
    /// use voltaje_core::money::Money;
    ///
    /// let price = Money::from_units(100_000);
    /// assert_eq!(price.to_string(), "$ 100.000");
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns the exact underlying amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit amount by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use voltaje_core::money::Money;
    ///
    /// let unit = Money::from_units(78_330);
    /// assert_eq!(unit.multiply_quantity(2), Money::from_units(156_660));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Scales the amount by an arbitrary decimal factor (e.g. a cost ratio).
    #[inline]
    pub fn scale(&self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }

    /// Addition that returns `None` instead of panicking on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// [`scale`](Self::scale) that returns `None` on overflow.
    #[inline]
    pub fn checked_scale(&self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Formats the amount for display, rounding once to the format's
    /// number of decimals (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use voltaje_core::money::{CurrencyFormat, Money};
    ///
    /// let total = Money::new(dec!(107100.5));
    /// assert_eq!(total.format(&CurrencyFormat::cop()), "$ 107.101");
    ///
    /// let usd = CurrencyFormat::new("US$", ',', '.', 2);
    /// assert_eq!(total.format(&usd), "US$ 107,100.50");
    /// ```
    pub fn format(&self, format: &CurrencyFormat) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(format.decimals, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.*}", format.decimals as usize, rounded.abs());
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (digits.as_str(), None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(format.thousands_separator);
            }
            grouped.push(ch);
        }

        match frac_part {
            Some(frac) if format.decimals > 0 => format!(
                "{}{} {}{}{}",
                sign, format.symbol, grouped, format.decimal_separator, frac
            ),
            _ => format!("{}{} {}", sign, format.symbol, grouped),
        }
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// Locale settings used when rendering money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Symbol printed before the amount.
    pub symbol: String,
    /// Digit grouping separator.
    pub thousands_separator: char,
    /// Separator before the fractional digits.
    pub decimal_separator: char,
    /// Number of fractional digits shown.
    pub decimals: u32,
}

impl CurrencyFormat {
    pub fn new(
        symbol: impl Into<String>,
        thousands_separator: char,
        decimal_separator: char,
        decimals: u32,
    ) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            thousands_separator,
            decimal_separator,
            decimals,
        }
    }

    /// Colombian pesos: `$ 1.234.567`, no decimals.
    pub fn cop() -> Self {
        CurrencyFormat::new("$", '.', ',', 0)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::cop()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders with the default (COP) currency format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&CurrencyFormat::default()))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Multiplication by a decimal factor (fractional material quantities).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        self.scale(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
