//! # Pricing Engine
//!
//! Turns quote lines plus quote-level modifiers into an itemized breakdown.
//!
//! ## Two Strategies, On Purpose
//! The quote builder and the work-order editor price "the same" quote with
//! different formulas. Both are kept, selected explicitly by [`PricingMode`];
//! the engine never chooses one on its own.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteLevelAiu (quote builder)                                          │
//! │                                                                         │
//! │  Σ qty × sale price ──► − discount ──► base                             │
//! │                                          │                              │
//! │                     ┌────────────────────┼────────────────────┐         │
//! │                     ▼                    ▼                    ▼         │
//! │               admin % base     contingency % base      profit % base   │
//! │                                                              │          │
//! │                         VAT % (base + profit) ◄──────────────┘          │
//! │                                                                         │
//! │  grand = base + admin + contingency + profit + VAT                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  PerLineAiu (work-order editor)                                         │
//! │                                                                         │
//! │  per line: cost = supplier cost ?? sale price × fallback ratio          │
//! │            unit sale = cost + admin + contingency + profit              │
//! │            unit final = unit sale + profit × tax-on-profit %            │
//! │  Σ unit final × qty ──► − discount ──► + VAT % (discounted)             │
//! │                                                                         │
//! │  NOTE: VAT is charged again on lines already carrying tax on profit.    │
//! │  This mirrors the work-order editor as deployed; reconciling the two    │
//! │  formulas is a product decision.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! None. Every amount keeps full decimal precision; only
//! [`Money::format`](crate::money::Money::format) rounds for display.
//!
//! ## Example
//! ```rust
//! use voltaje_core::pricing::{compute_totals, PricingMode, PricingPolicy};
//! use voltaje_core::{LineItem, Money, Percent, QuoteModifiers};
//!
//! let mut modifiers = QuoteModifiers::default(); // 19% VAT
//! modifiers.global_discount = Percent::from_units(10);
//! let items = vec![LineItem::product("Tablero", 1, Money::from_units(100_000), &modifiers)];
//!
//! let totals = compute_totals(
//!     &items,
//!     &modifiers,
//!     PricingMode::QuoteLevelAiu,
//!     &PricingPolicy::default(),
//! )
//! .unwrap();
//! assert_eq!(totals.discount_amount, Money::from_units(10_000));
//! assert_eq!(totals.tax_amount, Money::from_units(17_100));
//! assert_eq!(totals.grand_total, Money::from_units(107_100));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AiuRates, ItemKind, LineItem, QuoteModifiers};
use crate::validation::{validate_line_items, validate_modifiers, validate_ratio};

/// Share of the sale price assumed as cost when a line has no supplier cost.
///
/// A heuristic carried over from the work-order editor, not a business rule:
/// nobody has documented where 70% comes from. Override it through
/// [`PricingPolicy`] or disable it with [`CostFallback::Disabled`].
pub const DEFAULT_COST_FALLBACK_RATIO: Decimal = dec!(0.70);

// =============================================================================
// Mode & Policy
// =============================================================================

/// Which pricing formula to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// AIU applied once to the discounted subtotal; VAT on base + profit.
    #[default]
    QuoteLevelAiu,
    /// AIU applied to each line's cost; global discount and VAT on top.
    PerLineAiu,
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingMode::QuoteLevelAiu => write!(f, "quote-level"),
            PricingMode::PerLineAiu => write!(f, "per-line"),
        }
    }
}

impl std::str::FromStr for PricingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quote-level" | "quote_level" | "quote_level_aiu" | "a" => Ok(PricingMode::QuoteLevelAiu),
            "per-line" | "per_line" | "per_line_aiu" | "b" => Ok(PricingMode::PerLineAiu),
            other => Err(ValidationError::InvalidFormat {
                field: "pricing mode".to_string(),
                reason: format!("'{}' is not one of: quote-level, per-line", other),
            }),
        }
    }
}

/// What per-line pricing does when a line has no supplier cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostFallback {
    /// Use `sale_unit_price × ratio` as the cost basis.
    SalePriceRatio(Decimal),
    /// Fail with [`CoreError::MissingCostBasis`].
    Disabled,
}

/// Engine knobs that are configuration, not quote data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    pub cost_fallback: CostFallback,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            cost_fallback: CostFallback::SalePriceRatio(DEFAULT_COST_FALLBACK_RATIO),
        }
    }
}

impl PricingPolicy {
    /// Requires a supplier cost on every line priced per line.
    pub fn strict() -> Self {
        PricingPolicy {
            cost_fallback: CostFallback::Disabled,
        }
    }

    pub fn with_fallback_ratio(ratio: Decimal) -> Self {
        PricingPolicy {
            cost_fallback: CostFallback::SalePriceRatio(ratio),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.cost_fallback {
            CostFallback::SalePriceRatio(ratio) => validate_ratio("cost fallback ratio", ratio),
            CostFallback::Disabled => Ok(()),
        }
    }
}

// =============================================================================
// Breakdown Types
// =============================================================================

/// Where a line's cost basis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CostSource {
    Supplier,
    SalePriceFallback,
}

/// Per-unit AIU build-up of one line (per-line pricing only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnitAiu {
    pub unit_cost: Money,
    pub cost_source: CostSource,
    pub admin: Money,
    pub contingency: Money,
    pub profit: Money,
    /// cost + admin + contingency + profit
    pub unit_sale_price: Money,
    pub tax_on_profit: Money,
    /// unit_sale_price + tax_on_profit
    pub unit_final: Money,
}

impl UnitAiu {
    /// Loads a unit cost with the given AIU rates.
    ///
    /// ## Example
    /// ```rust
    /// use voltaje_core::pricing::{CostSource, UnitAiu};
    /// use voltaje_core::{AiuRates, Money, Percent};
    ///
    /// let rates = AiuRates::new(
    ///     Percent::zero(),
    ///     Percent::zero(),
    ///     Percent::from_units(10),
    ///     Percent::from_units(19),
    /// );
    /// let unit = UnitAiu::from_cost(Money::from_units(70_000), CostSource::Supplier, &rates);
    /// assert_eq!(unit.profit, Money::from_units(7_000));
    /// assert_eq!(unit.tax_on_profit, Money::from_units(1_330));
    /// assert_eq!(unit.unit_final, Money::from_units(78_330));
    /// ```
    pub fn from_cost(unit_cost: Money, cost_source: CostSource, rates: &AiuRates) -> Self {
        let admin = rates.admin.of(unit_cost);
        let contingency = rates.contingency.of(unit_cost);
        let profit = rates.profit.of(unit_cost);
        let unit_sale_price = unit_cost + admin + contingency + profit;
        // Zero profit makes this zero whatever the rate is
        let tax_on_profit = rates.tax_on_profit.of(profit);

        UnitAiu {
            unit_cost,
            cost_source,
            admin,
            contingency,
            profit,
            unit_sale_price,
            tax_on_profit,
            unit_final: unit_sale_price + tax_on_profit,
        }
    }
}

/// A kit component as rendered under its parent line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubItemLine {
    pub name: String,
    /// Sub-item quantity already multiplied by the parent line quantity.
    #[ts(type = "string")]
    pub quantity: Decimal,
    pub unit_price: Money,
    pub total: Money,
}

/// One priced line of the breakdown, parallel to the input items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub item_id: String,
    pub kind: ItemKind,
    pub description: String,
    pub quantity: i64,
    /// Price per unit used for the line total.
    pub unit_price: Money,
    pub line_total: Money,
    /// Present in per-line pricing only.
    pub aiu: Option<UnitAiu>,
    /// Empty when the line hides its kit contents.
    pub sub_items: Vec<SubItemLine>,
    pub sub_items_hidden: bool,
}

impl LineBreakdown {
    fn new(item: &LineItem, unit_price: Money, aiu: Option<UnitAiu>) -> Self {
        let hidden = item.hides_sub_items();
        let quantity = Decimal::from(item.quantity);
        let sub_items = if hidden {
            Vec::new()
        } else {
            item.sub_items()
                .iter()
                .map(|sub| {
                    let extended = sub.quantity * quantity;
                    SubItemLine {
                        name: sub.name.clone(),
                        quantity: extended,
                        unit_price: sub.unit_price,
                        total: sub.unit_price * extended,
                    }
                })
                .collect()
        };

        LineBreakdown {
            item_id: item.id.clone(),
            kind: item.kind(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price,
            line_total: unit_price * item.quantity,
            aiu,
            sub_items,
            sub_items_hidden: hidden,
        }
    }
}

/// Aggregate result of a pricing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub mode: PricingMode,
    /// Σ line totals.
    pub subtotal: Money,
    pub discount_amount: Money,
    /// subtotal − discount
    pub discounted_subtotal: Money,
    pub aiu_admin_amount: Money,
    pub aiu_contingency_amount: Money,
    pub aiu_profit_amount: Money,
    /// Σ tax on profit × qty (per-line pricing; zero at quote level).
    pub tax_on_profit_amount: Money,
    /// Amount the global VAT was levied on.
    pub taxable_base: Money,
    pub tax_amount: Money,
    pub grand_total: Money,
    pub lines: Vec<LineBreakdown>,
}

impl Totals {
    /// All-zero totals for a quote with no lines.
    pub fn empty(mode: PricingMode) -> Self {
        Totals {
            mode,
            subtotal: Money::zero(),
            discount_amount: Money::zero(),
            discounted_subtotal: Money::zero(),
            aiu_admin_amount: Money::zero(),
            aiu_contingency_amount: Money::zero(),
            aiu_profit_amount: Money::zero(),
            tax_on_profit_amount: Money::zero(),
            taxable_base: Money::zero(),
            tax_amount: Money::zero(),
            grand_total: Money::zero(),
            lines: Vec::new(),
        }
    }

    /// Admin + contingency + profit.
    pub fn aiu_total(&self) -> Money {
        self.aiu_admin_amount + self.aiu_contingency_amount + self.aiu_profit_amount
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Prices `items` under `modifiers` with the chosen `mode`.
///
/// ## Errors
/// - [`ValidationError`] for quantities below 1, negative amounts,
///   percentages outside [0, 100], duplicate line ids or a bad fallback ratio
/// - [`CoreError::MissingCostBasis`] in per-line mode when a line has no
///   supplier cost and the policy disables the fallback
///
/// Input is checked in full before any arithmetic, so an error never comes
/// with partial totals.
pub fn compute_totals(
    items: &[LineItem],
    modifiers: &QuoteModifiers,
    mode: PricingMode,
    policy: &PricingPolicy,
) -> CoreResult<Totals> {
    policy.validate()?;
    validate_modifiers(modifiers)?;
    validate_line_items(items)?;

    match mode {
        PricingMode::QuoteLevelAiu => Ok(price_quote_level(items, modifiers)),
        PricingMode::PerLineAiu => price_per_line(items, modifiers, policy),
    }
}

/// Resolves the cost basis of a line for per-line pricing.
pub fn resolve_unit_cost(item: &LineItem, policy: &PricingPolicy) -> CoreResult<(Money, CostSource)> {
    match (item.supplier_unit_cost, policy.cost_fallback) {
        (Some(cost), _) => Ok((cost, CostSource::Supplier)),
        (None, CostFallback::SalePriceRatio(ratio)) => {
            Ok((item.sale_unit_price.scale(ratio), CostSource::SalePriceFallback))
        }
        (None, CostFallback::Disabled) => Err(CoreError::MissingCostBasis {
            item_id: item.id.clone(),
        }),
    }
}

fn price_quote_level(items: &[LineItem], modifiers: &QuoteModifiers) -> Totals {
    let lines: Vec<LineBreakdown> = items
        .iter()
        .map(|item| LineBreakdown::new(item, item.sale_unit_price, None))
        .collect();

    let subtotal: Money = lines.iter().map(|line| line.line_total).sum();
    let discount_amount = modifiers.global_discount.of(subtotal);
    let base = subtotal - discount_amount;

    let aiu_admin_amount = modifiers.aiu.admin.of(base);
    let aiu_contingency_amount = modifiers.aiu.contingency.of(base);
    let aiu_profit_amount = modifiers.aiu.profit.of(base);

    // VAT follows the utility, not the whole AIU
    let taxable_base = base + aiu_profit_amount;
    let tax_amount = modifiers.global_tax.of(taxable_base);

    Totals {
        mode: PricingMode::QuoteLevelAiu,
        subtotal,
        discount_amount,
        discounted_subtotal: base,
        aiu_admin_amount,
        aiu_contingency_amount,
        aiu_profit_amount,
        tax_on_profit_amount: Money::zero(),
        taxable_base,
        tax_amount,
        grand_total: base + aiu_admin_amount + aiu_contingency_amount + aiu_profit_amount + tax_amount,
        lines,
    }
}

fn price_per_line(
    items: &[LineItem],
    modifiers: &QuoteModifiers,
    policy: &PricingPolicy,
) -> CoreResult<Totals> {
    let mut totals = Totals::empty(PricingMode::PerLineAiu);
    totals.lines.reserve(items.len());

    for item in items {
        let (cost, source) = resolve_unit_cost(item, policy)?;
        let unit = UnitAiu::from_cost(cost, source, &item.aiu);

        totals.aiu_admin_amount += unit.admin * item.quantity;
        totals.aiu_contingency_amount += unit.contingency * item.quantity;
        totals.aiu_profit_amount += unit.profit * item.quantity;
        totals.tax_on_profit_amount += unit.tax_on_profit * item.quantity;

        let line = LineBreakdown::new(item, unit.unit_final, Some(unit));
        totals.subtotal += line.line_total;
        totals.lines.push(line);
    }

    totals.discount_amount = modifiers.global_discount.of(totals.subtotal);
    totals.discounted_subtotal = totals.subtotal - totals.discount_amount;
    totals.taxable_base = totals.discounted_subtotal;
    totals.tax_amount = modifiers.global_tax.of(totals.taxable_base);
    totals.grand_total = totals.discounted_subtotal + totals.tax_amount;

    Ok(totals)
}

// =============================================================================
// Unit Tests
// =============================================================================
