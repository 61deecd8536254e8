//! # Domain Types
//!
//! Core domain types used throughout Voltaje ERP.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Quote       │   │    LineItem     │   │ QuoteModifiers  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  id             │   │  global_discount│       │
//! │  │  number         │   │  quantity       │   │  global_tax     │       │
//! │  │  status         │   │  supplier cost  │   │  aiu (AiuRates) │       │
//! │  │  mode           │   │  sale price     │   └─────────────────┘       │
//! │  │  modifiers      │   │  aiu (AiuRates) │                             │
//! │  └─────────────────┘   │  detail:        │   ┌─────────────────┐       │
//! │                        │   PRODUCT       │   │    AiuRates     │       │
//! │                        │   SERVICE+kit   │   │  admin          │       │
//! │                        └─────────────────┘   │  contingency    │       │
//! │                                              │  profit         │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  tax_on_profit  │       │
//! │  │ InventoryItem   │   │TrackedDocument  │   └─────────────────┘       │
//! │  │  current / min  │   │  expires_at     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modifier Propagation
//! Quote-level modifiers are copied into each line when the line is created.
//! Changing the quote modifiers later does NOT touch existing lines unless the
//! caller asks for it with [`QuoteModifiers::reapply_to`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::classify::{classify_expiration, classify_stock, ExpirationStatus, StockStatus};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{compute_totals, PricingMode, PricingPolicy, Totals};
use crate::work_code::{material_requirements, MaterialRequirement};
use crate::{DEFAULT_TAX_ON_PROFIT_PCT, DEFAULT_VAT_PCT};

// =============================================================================
// Percent
// =============================================================================

/// A percentage in the 0–100 scale (19 = 19%).
///
/// Construction does not validate; [`crate::validation`] rejects values
/// outside [0, 100] before the engine runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Creates a percentage from a whole number (`from_units(19)` = 19%).
    #[inline]
    pub fn from_units(value: u32) -> Self {
        Percent(Decimal::from(value))
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Returns the raw 0–100 value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies the percentage to an amount: `amount × pct / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use voltaje_core::{Money, Percent};
    ///
    /// let vat = Percent::from_units(19);
    /// assert_eq!(vat.of(Money::from_units(90_000)), Money::from_units(17_100));
    /// ```
    #[inline]
    pub fn of(&self, amount: Money) -> Money {
        Money::new(amount.amount() * self.0 / Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// AIU Rates
// =============================================================================

/// Administración / Imprevistos / Utilidad markups plus the VAT charged on the
/// utility component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AiuRates {
    /// Administration / overhead.
    #[serde(default)]
    pub admin: Percent,
    /// Contingency (imprevistos).
    #[serde(default)]
    pub contingency: Percent,
    /// Profit (utilidad).
    #[serde(default)]
    pub profit: Percent,
    /// VAT levied on the profit component only.
    #[serde(default = "default_tax_on_profit")]
    pub tax_on_profit: Percent,
}

fn default_tax_on_profit() -> Percent {
    Percent::from_units(DEFAULT_TAX_ON_PROFIT_PCT)
}

fn default_vat() -> Percent {
    Percent::from_units(DEFAULT_VAT_PCT)
}

impl AiuRates {
    pub fn new(admin: Percent, contingency: Percent, profit: Percent, tax_on_profit: Percent) -> Self {
        AiuRates {
            admin,
            contingency,
            profit,
            tax_on_profit,
        }
    }

    /// Admin + contingency + profit, ignoring tax-on-profit.
    pub fn total_markup(&self) -> Percent {
        Percent::new(self.admin.value() + self.contingency.value() + self.profit.value())
    }
}

impl Default for AiuRates {
    fn default() -> Self {
        AiuRates {
            admin: Percent::zero(),
            contingency: Percent::zero(),
            profit: Percent::zero(),
            tax_on_profit: default_tax_on_profit(),
        }
    }
}

// =============================================================================
// Quote Modifiers
// =============================================================================

/// Quote-level percentages.
///
/// ## Defaults
/// - Discount: 0%
/// - VAT: 19%
/// - AIU: 0% / 0% / 0%, tax on profit 19%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteModifiers {
    #[serde(default)]
    pub global_discount: Percent,
    #[serde(default = "default_vat")]
    pub global_tax: Percent,
    #[serde(default)]
    pub aiu: AiuRates,
}

impl Default for QuoteModifiers {
    fn default() -> Self {
        QuoteModifiers {
            global_discount: Percent::zero(),
            global_tax: default_vat(),
            aiu: AiuRates::default(),
        }
    }
}

impl QuoteModifiers {
    /// Modifiers with every percentage at zero (no discount, no tax, no AIU).
    pub fn none() -> Self {
        QuoteModifiers {
            global_discount: Percent::zero(),
            global_tax: Percent::zero(),
            aiu: AiuRates::new(
                Percent::zero(),
                Percent::zero(),
                Percent::zero(),
                Percent::zero(),
            ),
        }
    }

    /// Overwrites the per-line AIU rates of `items` with the quote-level ones.
    ///
    /// This is the only way quote-level edits reach existing lines.
    pub fn reapply_to(&self, items: &mut [LineItem]) {
        for item in items {
            item.aiu = self.aiu;
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// Discriminant of [`ItemDetail`], handy for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Product,
    Service,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Product => write!(f, "PRODUCT"),
            ItemKind::Service => write!(f, "SERVICE"),
        }
    }
}

/// One component of a composite service kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubItem {
    pub name: String,
    /// Quantity per ONE unit of the parent line (may be fractional: 2.5 m).
    #[ts(type = "string")]
    pub quantity: Decimal,
    pub unit_price: Money,
}

impl SubItem {
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Money) -> Self {
        SubItem {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// `quantity × unit_price` for one parent unit.
    pub fn unit_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Fields that only make sense for one kind of line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemDetail {
    /// Catalog material resold as-is.
    Product {
        #[serde(default)]
        sku: Option<String>,
    },
    /// Labor or a composite service kit.
    Service {
        #[serde(default, rename = "subItems")]
        sub_items: Vec<SubItem>,
        /// Hide the kit contents from rendered output; totals are unaffected.
        #[serde(default, rename = "hideSubItemsInOutput")]
        hide_sub_items_in_output: bool,
        /// Work code (APU) the line was generated from, if any.
        #[serde(default, rename = "workCode")]
        work_code: Option<String>,
    },
}

/// A priced line on a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique within a quote.
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    /// Cost basis; `None` falls back to a ratio of the sale price in
    /// per-line AIU pricing.
    #[serde(default)]
    pub supplier_unit_cost: Option<Money>,
    pub sale_unit_price: Money,
    /// Per-line AIU, copied from the quote when the line was created.
    #[serde(default)]
    pub aiu: AiuRates,
    #[serde(flatten)]
    pub detail: ItemDetail,
}

impl LineItem {
    fn with_detail(
        description: impl Into<String>,
        quantity: i64,
        sale_unit_price: Money,
        modifiers: &QuoteModifiers,
        detail: ItemDetail,
    ) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            quantity,
            supplier_unit_cost: None,
            sale_unit_price,
            aiu: modifiers.aiu,
            detail,
        }
    }

    /// Creates a product line inheriting the quote's current AIU rates.
    pub fn product(
        description: impl Into<String>,
        quantity: i64,
        sale_unit_price: Money,
        modifiers: &QuoteModifiers,
    ) -> Self {
        Self::with_detail(
            description,
            quantity,
            sale_unit_price,
            modifiers,
            ItemDetail::Product { sku: None },
        )
    }

    /// Creates a service line (no kit contents) inheriting the quote's AIU.
    pub fn service(
        description: impl Into<String>,
        quantity: i64,
        sale_unit_price: Money,
        modifiers: &QuoteModifiers,
    ) -> Self {
        Self::with_detail(
            description,
            quantity,
            sale_unit_price,
            modifiers,
            ItemDetail::Service {
                sub_items: Vec::new(),
                hide_sub_items_in_output: false,
                work_code: None,
            },
        )
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_supplier_cost(mut self, cost: Money) -> Self {
        self.supplier_unit_cost = Some(cost);
        self
    }

    pub fn with_aiu(mut self, aiu: AiuRates) -> Self {
        self.aiu = aiu;
        self
    }

    /// Replaces the kit contents. No-op on product lines.
    pub fn with_sub_items(mut self, items: Vec<SubItem>) -> Self {
        if let ItemDetail::Service { sub_items, .. } = &mut self.detail {
            *sub_items = items;
        }
        self
    }

    /// Sets the hide-in-output flag. No-op on product lines.
    pub fn hide_sub_items(mut self, hide: bool) -> Self {
        if let ItemDetail::Service {
            hide_sub_items_in_output,
            ..
        } = &mut self.detail
        {
            *hide_sub_items_in_output = hide;
        }
        self
    }

    /// Records the work code a service line was generated from.
    pub fn with_work_code(mut self, code: impl Into<String>) -> Self {
        if let ItemDetail::Service { work_code, .. } = &mut self.detail {
            *work_code = Some(code.into());
        }
        self
    }

    pub fn work_code(&self) -> Option<&str> {
        match &self.detail {
            ItemDetail::Service { work_code, .. } => work_code.as_deref(),
            ItemDetail::Product { .. } => None,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self.detail {
            ItemDetail::Product { .. } => ItemKind::Product,
            ItemDetail::Service { .. } => ItemKind::Service,
        }
    }

    /// Kit contents; always empty for products.
    pub fn sub_items(&self) -> &[SubItem] {
        match &self.detail {
            ItemDetail::Product { .. } => &[],
            ItemDetail::Service { sub_items, .. } => sub_items,
        }
    }

    pub fn hides_sub_items(&self) -> bool {
        matches!(
            self.detail,
            ItemDetail::Service {
                hide_sub_items_in_output: true,
                ..
            }
        )
    }

    /// `quantity × sale_unit_price`, before any modifier.
    pub fn gross_total(&self) -> Money {
        self.sale_unit_price * self.quantity
    }
}

// =============================================================================
// Quote Status
// =============================================================================

/// Workflow status of a quote. Not used by pricing.
///
/// ```text
/// Draft ──► Sent ──► Approved ──► InExecution ──► Finalized
///   ▲         │
///   │         ▼
///   └──── Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Approved,
    Rejected,
    InExecution,
    Finalized,
}

impl QuoteStatus {
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Sent, Approved)
                | (Sent, Rejected)
                | (Rejected, Draft)
                | (Approved, InExecution)
                | (InExecution, Finalized)
        )
    }

    /// Items and modifiers may only change on drafts.
    pub fn is_editable(&self) -> bool {
        matches!(self, QuoteStatus::Draft)
    }

    /// Approved work counts toward the committed pipeline.
    pub fn is_committed(&self) -> bool {
        matches!(self, QuoteStatus::Approved | QuoteStatus::InExecution)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStatus::Draft => write!(f, "draft"),
            QuoteStatus::Sent => write!(f, "sent"),
            QuoteStatus::Approved => write!(f, "approved"),
            QuoteStatus::Rejected => write!(f, "rejected"),
            QuoteStatus::InExecution => write!(f, "in_execution"),
            QuoteStatus::Finalized => write!(f, "finalized"),
        }
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "borrador" => Ok(QuoteStatus::Draft),
            "sent" | "enviada" => Ok(QuoteStatus::Sent),
            "approved" | "aprobada" => Ok(QuoteStatus::Approved),
            "rejected" | "rechazada" => Ok(QuoteStatus::Rejected),
            "in_execution" | "en_ejecucion" => Ok(QuoteStatus::InExecution),
            "finalized" | "finalizada" => Ok(QuoteStatus::Finalized),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown quote status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A priced proposal: ordered lines plus one set of modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    /// Human-readable number (e.g. `COT-0042`).
    pub number: String,
    pub client_name: String,
    pub status: QuoteStatus,
    pub mode: PricingMode,
    pub modifiers: QuoteModifiers,
    pub items: Vec<LineItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Creates an empty draft with default modifiers.
    pub fn new(number: impl Into<String>, client_name: impl Into<String>, mode: PricingMode) -> Self {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4().to_string(),
            number: number.into(),
            client_name: client_name.into(),
            status: QuoteStatus::Draft,
            mode,
            modifiers: QuoteModifiers::default(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn ensure_editable(&self) -> CoreResult<()> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(CoreError::QuoteNotEditable {
                quote_id: self.id.clone(),
                status: self.status,
            })
        }
    }

    /// Appends a line. Ids must stay unique within the quote.
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        self.ensure_editable()?;
        if self.items.iter().any(|existing| existing.id == item.id) {
            return Err(ValidationError::Duplicate {
                field: "line item id".to_string(),
                value: item.id,
            }
            .into());
        }
        self.items.push(item);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the line with the same id.
    pub fn update_item(&mut self, item: LineItem) -> CoreResult<()> {
        self.ensure_editable()?;
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or_else(|| CoreError::LineItemNotFound(item.id.clone()))?;
        *slot = item;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<LineItem> {
        self.ensure_editable()?;
        let index = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))?;
        self.updated_at = Utc::now();
        Ok(self.items.remove(index))
    }

    /// Changes the quote-level modifiers.
    ///
    /// Existing lines keep their own AIU unless `reapply` is set.
    pub fn set_modifiers(&mut self, modifiers: QuoteModifiers, reapply: bool) -> CoreResult<()> {
        self.ensure_editable()?;
        self.modifiers = modifiers;
        if reapply {
            modifiers.reapply_to(&mut self.items);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the quote through its lifecycle.
    pub fn transition(&mut self, next: QuoteStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                quote_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Prices the quote with its own mode.
    pub fn totals(&self, policy: &PricingPolicy) -> CoreResult<Totals> {
        compute_totals(&self.items, &self.modifiers, self.mode, policy)
    }

    /// Materials needed to execute every service kit on the quote.
    pub fn material_requirements(&self) -> CoreResult<Vec<MaterialRequirement>> {
        material_requirements(&self.items)
    }
}

// =============================================================================
// Inventory & Fleet
// =============================================================================

/// A stocked material with its reorder threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub current_qty: i64,
    pub min_qty: i64,
}

impl InventoryItem {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, current_qty: i64, min_qty: i64) -> Self {
        InventoryItem {
            id: Uuid::new_v4().to_string(),
            sku: sku.into(),
            name: name.into(),
            current_qty,
            min_qty,
        }
    }

    pub fn stock_status(&self) -> StockStatus {
        classify_stock(self.current_qty, self.min_qty)
    }
}

/// Kind of document whose expiration is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Mandatory vehicle accident insurance.
    Soat,
    /// Vehicle technical-mechanical inspection.
    TechnicalInspection,
    /// Driver license.
    DriverLicense,
    /// Work-at-heights or electrical competence certificate.
    Certification,
    Other,
}

/// A fleet or staff document with an expiration date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TrackedDocument {
    pub id: String,
    /// Plate number or employee name.
    pub owner: String,
    pub kind: DocumentKind,
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
}

impl TrackedDocument {
    pub fn new(owner: impl Into<String>, kind: DocumentKind, expires_at: DateTime<Utc>) -> Self {
        TrackedDocument {
            id: Uuid::new_v4().to_string(),
            owner: owner.into(),
            kind,
            expires_at,
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> ExpirationStatus {
        classify_expiration(self.expires_at, now)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        let pct = Percent::new(dec!(10));
        assert_eq!(pct.of(Money::from_units(1_000_000)), Money::from_units(100_000));
        assert!(Percent::zero().of(Money::from_units(5)).is_zero());
        assert_eq!(Percent::new(dec!(19.0)).to_string(), "19%");
    }

    #[test]
    fn test_modifier_defaults() {
        let modifiers = QuoteModifiers::default();
        assert_eq!(modifiers.global_tax, Percent::from_units(19));
        assert_eq!(modifiers.aiu.tax_on_profit, Percent::from_units(19));
        assert!(modifiers.global_discount.is_zero());
        assert!(modifiers.aiu.profit.is_zero());
    }

    #[test]
    fn test_line_copies_modifiers_at_creation() {
        let mut modifiers = QuoteModifiers::default();
        modifiers.aiu.profit = Percent::from_units(10);
        let mut items = vec![LineItem::product("Cable 12 AWG", 3, Money::from_units(5_000), &modifiers)];

        // Later edits do not leak into existing lines...
        modifiers.aiu.profit = Percent::from_units(15);
        assert_eq!(items[0].aiu.profit, Percent::from_units(10));

        // ...until explicitly re-applied
        modifiers.reapply_to(&mut items);
        assert_eq!(items[0].aiu.profit, Percent::from_units(15));
    }

    #[test]
    fn test_line_item_json_shape() {
        let json = r#"{
            "id": "l1",
            "description": "Salida eléctrica",
            "quantity": 2,
            "saleUnitPrice": "85000",
            "kind": "SERVICE",
            "subItems": [{ "name": "Cable", "quantity": "2.5", "unitPrice": "3200" }],
            "hideSubItemsInOutput": true
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), ItemKind::Service);
        assert_eq!(item.sub_items().len(), 1);
        assert_eq!(item.sub_items()[0].quantity, dec!(2.5));
        assert!(item.hides_sub_items());
        assert_eq!(item.aiu, AiuRates::default());
        assert_eq!(item.supplier_unit_cost, None);

        let product: LineItem = serde_json::from_str(
            r#"{ "id": "p1", "quantity": 1, "saleUnitPrice": "100", "kind": "PRODUCT" }"#,
        )
        .unwrap();
        assert_eq!(product.kind(), ItemKind::Product);
        assert!(product.sub_items().is_empty());
        assert!(!product.hides_sub_items());
    }

    #[test]
    fn test_sub_item_builders_ignore_products() {
        let modifiers = QuoteModifiers::default();
        let product = LineItem::product("Breaker", 1, Money::from_units(30_000), &modifiers)
            .with_sub_items(vec![SubItem::new("x", dec!(1), Money::from_units(1))])
            .hide_sub_items(true);
        assert!(product.sub_items().is_empty());
        assert!(!product.hides_sub_items());
    }

    #[test]
    fn test_status_transitions() {
        use QuoteStatus::*;
        assert!(Draft.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Approved));
        assert!(Sent.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Draft));
        assert!(Approved.can_transition_to(InExecution));
        assert!(InExecution.can_transition_to(Finalized));

        assert!(!Draft.can_transition_to(Approved));
        assert!(!Finalized.can_transition_to(Draft));
        assert!(!Approved.can_transition_to(Rejected));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("aprobada".parse::<QuoteStatus>().unwrap(), QuoteStatus::Approved);
        assert_eq!("in_execution".parse::<QuoteStatus>().unwrap(), QuoteStatus::InExecution);
        assert!("paid".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn test_quote_editing_rules() {
        let mut quote = Quote::new("COT-0001", "Constructora Andina", PricingMode::QuoteLevelAiu);
        let item = LineItem::product("Tablero", 1, Money::from_units(450_000), &quote.modifiers)
            .with_id("l1");
        quote.add_item(item.clone()).unwrap();

        let dup = quote.add_item(item.clone()).unwrap_err();
        assert!(matches!(
            dup,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));

        quote.transition(QuoteStatus::Sent).unwrap();
        let err = quote.remove_item("l1").unwrap_err();
        assert!(matches!(err, CoreError::QuoteNotEditable { .. }));

        let err = quote.transition(QuoteStatus::Finalized).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));

        quote.transition(QuoteStatus::Rejected).unwrap();
        quote.transition(QuoteStatus::Draft).unwrap();
        assert_eq!(quote.remove_item("l1").unwrap().id, "l1");
        assert!(matches!(
            quote.remove_item("l1"),
            Err(CoreError::LineItemNotFound(_))
        ));
    }

    #[test]
    fn test_set_modifiers_reapply() {
        let mut quote = Quote::new("COT-0002", "Cliente", PricingMode::PerLineAiu);
        quote
            .add_item(LineItem::service("Mano de obra", 1, Money::from_units(10), &quote.modifiers))
            .unwrap();

        let mut modifiers = quote.modifiers;
        modifiers.aiu.admin = Percent::from_units(5);

        quote.set_modifiers(modifiers, false).unwrap();
        assert!(quote.items[0].aiu.admin.is_zero());

        quote.set_modifiers(modifiers, true).unwrap();
        assert_eq!(quote.items[0].aiu.admin, Percent::from_units(5));
    }
}
