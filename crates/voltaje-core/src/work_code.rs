//! # Work Codes (APU)
//!
//! A work code is a reusable priced unit of work: "install one double outlet"
//! = 2.5 m of cable + 1 outlet + 0.4 h of electrician. Codes may contain other
//! codes, so a catalog is a graph.
//!
//! ## Resolution
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐     ┌─────────────────┐
//! │   WorkCodeCatalog    │     │  1. unknown refs?    │     │ ResolvedCatalog │
//! │  (as edited, may be  │────►│  2. cycles?          │────►│  unit cost per  │
//! │   inconsistent)      │     │  3. topological eval │     │  code (arena)   │
//! └──────────────────────┘     └──────────────────────┘     └─────────────────┘
//! ```
//!
//! Costs and per-unit material lists are evaluated dependencies-first over a
//! flat arena, so resolving a deep catalog never recurses and a code shared by
//! many parents is expanded once. A [`ResolvedCatalog`] is a snapshot: editing
//! the catalog afterwards requires resolving again.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{CostSource, UnitAiu};
use crate::types::{LineItem, QuoteModifiers, SubItem};
use crate::validation::{validate_amount, validate_line_items, validate_quantity};

// =============================================================================
// Catalog Types
// =============================================================================

/// What a component draws on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentSource {
    /// A leaf resource: material, labor hour or equipment rental.
    #[serde(rename_all = "camelCase")]
    Resource { name: String, unit_cost: Money },
    /// Another work code from the same catalog.
    WorkCode(String),
}

/// One entry of a work code's bill of quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Amount per ONE unit of the parent code.
    pub quantity: Decimal,
    #[serde(flatten)]
    pub source: ComponentSource,
}

impl Component {
    pub fn resource(name: impl Into<String>, quantity: Decimal, unit_cost: Money) -> Self {
        Component {
            quantity,
            source: ComponentSource::Resource {
                name: name.into(),
                unit_cost,
            },
        }
    }

    pub fn work_code(code: impl Into<String>, quantity: Decimal) -> Self {
        Component {
            quantity,
            source: ComponentSource::WorkCode(code.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCode {
    pub code: String,
    pub description: String,
    /// Unit of measure ("und", "m", "m2").
    #[serde(default)]
    pub unit: String,
    pub components: Vec<Component>,
}

impl WorkCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>, unit: impl Into<String>) -> Self {
        WorkCode {
            code: code.into(),
            description: description.into(),
            unit: unit.into(),
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    fn references(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.components.iter().filter_map(|c| match &c.source {
            ComponentSource::WorkCode(code) => Some(code.as_str()),
            ComponentSource::Resource { .. } => None,
        })
    }
}

/// Editable set of work codes, keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkCodeCatalog {
    codes: BTreeMap<String, WorkCode>,
}

impl WorkCodeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a code; codes are unique within a catalog.
    pub fn insert(&mut self, work_code: WorkCode) -> Result<(), ValidationError> {
        if work_code.code.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "work code".to_string(),
            });
        }
        if self.codes.contains_key(&work_code.code) {
            return Err(ValidationError::Duplicate {
                field: "work code".to_string(),
                value: work_code.code,
            });
        }
        self.codes.insert(work_code.code.clone(), work_code);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&WorkCode> {
        self.codes.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Checks the reference graph and computes the unit cost of every code.
    ///
    /// ## Errors
    /// - [`CoreError::UnknownWorkCode`] for a reference to a missing code
    /// - [`CoreError::CyclicWorkCode`] when codes contain each other
    /// - [`ValidationError::NegativeAmount`] for negative quantities or costs
    /// - [`CoreError::AmountOverflow`] when nested quantities leave `Decimal`'s range
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use voltaje_core::work_code::{Component, WorkCode, WorkCodeCatalog};
    /// use voltaje_core::Money;
    ///
    /// let mut catalog = WorkCodeCatalog::new();
    /// catalog
    ///     .insert(
    ///         WorkCode::new("SAL-01", "Salida toma doble", "und")
    ///             .with_component(Component::resource("Cable 12 AWG (m)", dec!(2.5), Money::from_units(3_200)))
    ///             .with_component(Component::resource("Toma doble", dec!(1), Money::from_units(9_000))),
    ///     )
    ///     .unwrap();
    ///
    /// let resolved = catalog.resolve().unwrap();
    /// assert_eq!(resolved.unit_cost("SAL-01").unwrap(), Money::from_units(17_000));
    /// ```
    pub fn resolve(&self) -> CoreResult<ResolvedCatalog> {
        self.validate_components()?;
        let order = self.topological_order()?;

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(order.len());
        let mut unit_costs: Vec<Money> = Vec::with_capacity(order.len());
        let mut requirements: Vec<Vec<MaterialRequirement>> = Vec::with_capacity(order.len());

        for code in order {
            let work_code = &self.codes[code];
            let context = || format!("resolving work code {}", code);
            let mut cost = Money::zero();
            let mut needs = RequirementList::default();

            for component in &work_code.components {
                let unit_cost = match &component.source {
                    ComponentSource::Resource { name, unit_cost } => {
                        let line_cost = unit_cost
                            .checked_scale(component.quantity)
                            .ok_or_else(|| overflow(context()))?;
                        needs.add(name, component.quantity, line_cost, context)?;
                        *unit_cost
                    }
                    // Dependencies come first in topological order
                    ComponentSource::WorkCode(child) => {
                        let slot = index[child.as_str()];
                        for need in &requirements[slot] {
                            let quantity = need
                                .quantity
                                .checked_mul(component.quantity)
                                .ok_or_else(|| overflow(context()))?;
                            let line_cost = need
                                .estimated_cost
                                .checked_scale(component.quantity)
                                .ok_or_else(|| overflow(context()))?;
                            needs.add(&need.name, quantity, line_cost, context)?;
                        }
                        unit_costs[slot]
                    }
                };
                cost = unit_cost
                    .checked_scale(component.quantity)
                    .and_then(|line| cost.checked_add(line))
                    .ok_or_else(|| overflow(context()))?;
            }

            index.insert(code, unit_costs.len());
            unit_costs.push(cost);
            requirements.push(needs.into_vec());
        }

        let index = index
            .into_iter()
            .map(|(code, slot)| (code.to_string(), slot))
            .collect();

        Ok(ResolvedCatalog {
            catalog: self.clone(),
            index,
            unit_costs,
            requirements,
        })
    }

    fn validate_components(&self) -> CoreResult<()> {
        for work_code in self.codes.values() {
            for component in &work_code.components {
                if component.quantity < Decimal::ZERO {
                    return Err(ValidationError::NegativeAmount {
                        field: format!("work code {} component quantity", work_code.code),
                        value: component.quantity,
                    }
                    .into());
                }
                match &component.source {
                    ComponentSource::Resource { name, unit_cost } if unit_cost.is_negative() => {
                        return Err(ValidationError::NegativeAmount {
                            field: format!("work code {} resource '{}' unit cost", work_code.code, name),
                            value: unit_cost.amount(),
                        }
                        .into());
                    }
                    ComponentSource::WorkCode(child) if !self.codes.contains_key(child) => {
                        return Err(CoreError::UnknownWorkCode {
                            parent: work_code.code.clone(),
                            missing: child.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Post-order DFS over the reference graph with an explicit stack.
    ///
    /// Roots are visited in sorted code order and children in declaration
    /// order, so the reported cycle is the same on every run.
    fn topological_order(&self) -> CoreResult<Vec<&str>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.codes.len());
        let mut order = Vec::with_capacity(self.codes.len());

        for root in self.codes.keys() {
            if marks.contains_key(root.as_str()) {
                continue;
            }

            // (code, references still to visit)
            let mut stack: Vec<(&str, Vec<&str>)> = Vec::new();
            marks.insert(root.as_str(), Mark::Visiting);
            stack.push((root.as_str(), self.codes[root].references().rev().collect()));

            while let Some((code, pending)) = stack.last_mut() {
                let code = *code;
                match pending.pop() {
                    Some(child) => match marks.get(child) {
                        Some(Mark::Done) => {}
                        Some(Mark::Visiting) => {
                            let start = stack.iter().position(|(c, _)| *c == child).unwrap_or(0);
                            let mut path: Vec<String> =
                                stack[start..].iter().map(|(c, _)| c.to_string()).collect();
                            path.push(child.to_string());
                            return Err(CoreError::CyclicWorkCode { path });
                        }
                        None => {
                            marks.insert(child, Mark::Visiting);
                            stack.push((child, self.codes[child].references().rev().collect()));
                        }
                    },
                    None => {
                        marks.insert(code, Mark::Done);
                        order.push(code);
                        stack.pop();
                    }
                }
            }
        }

        Ok(order)
    }
}

impl FromIterator<WorkCode> for WorkCodeCatalog {
    /// Later codes replace earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = WorkCode>>(iter: I) -> Self {
        WorkCodeCatalog {
            codes: iter.into_iter().map(|wc| (wc.code.clone(), wc)).collect(),
        }
    }
}

// =============================================================================
// Resolved Catalog
// =============================================================================

/// A validated catalog with every unit cost computed.
#[derive(Debug, Clone)]
pub struct ResolvedCatalog {
    catalog: WorkCodeCatalog,
    index: HashMap<String, usize>,
    unit_costs: Vec<Money>,
    /// Leaf resources for one unit of each code, folded bottom-up.
    requirements: Vec<Vec<MaterialRequirement>>,
}

impl ResolvedCatalog {
    fn slot(&self, code: &str) -> CoreResult<usize> {
        self.index
            .get(code)
            .copied()
            .ok_or_else(|| CoreError::WorkCodeNotFound(code.to_string()))
    }

    fn lookup(&self, code: &str) -> CoreResult<(&WorkCode, Money)> {
        match (self.catalog.get(code), self.index.get(code)) {
            (Some(work_code), Some(&slot)) => Ok((work_code, self.unit_costs[slot])),
            _ => Err(CoreError::WorkCodeNotFound(code.to_string())),
        }
    }

    /// Cost of one unit of `code`, nested codes included.
    pub fn unit_cost(&self, code: &str) -> CoreResult<Money> {
        self.lookup(code).map(|(_, cost)| cost)
    }

    /// Leaf resources needed for `quantity` units of `code`.
    ///
    /// Nested codes are expanded with their quantities multiplied through
    /// every level; resources are merged by name in first-seen order.
    pub fn material_requirements(&self, code: &str, quantity: Decimal) -> CoreResult<Vec<MaterialRequirement>> {
        let context = || format!("expanding {} × {}", quantity, code);
        self.requirements[self.slot(code)?]
            .iter()
            .map(|need| {
                Ok(MaterialRequirement {
                    name: need.name.clone(),
                    quantity: need
                        .quantity
                        .checked_mul(quantity)
                        .ok_or_else(|| overflow(context()))?,
                    estimated_cost: need
                        .estimated_cost
                        .checked_scale(quantity)
                        .ok_or_else(|| overflow(context()))?,
                })
            })
            .collect()
    }

    /// Builds a SERVICE line for `quantity` units of `code`.
    ///
    /// The supplier cost is the resolved unit cost, the sale price is that
    /// cost loaded with the modifiers' AIU, and the direct components become
    /// the kit contents.
    pub fn to_line_item(&self, code: &str, quantity: i64, modifiers: &QuoteModifiers) -> CoreResult<LineItem> {
        let (work_code, cost) = self.lookup(code)?;
        validate_quantity(code, quantity)?;
        validate_amount(&format!("work code {} unit cost", code), cost)?;
        let unit = UnitAiu::from_cost(cost, CostSource::Supplier, &modifiers.aiu);

        let mut sub_items = Vec::with_capacity(work_code.components.len());
        for component in &work_code.components {
            let sub_item = match &component.source {
                ComponentSource::Resource { name, unit_cost } => {
                    SubItem::new(name.clone(), component.quantity, *unit_cost)
                }
                ComponentSource::WorkCode(child) => {
                    let (nested, nested_cost) = self.lookup(child)?;
                    SubItem::new(nested.description.clone(), component.quantity, nested_cost)
                }
            };
            sub_items.push(sub_item);
        }

        Ok(
            LineItem::service(work_code.description.clone(), quantity, unit.unit_sale_price, modifiers)
                .with_supplier_cost(cost)
                .with_sub_items(sub_items)
                .with_work_code(code),
        )
    }
}

// =============================================================================
// Material Requirements
// =============================================================================

/// Aggregated need for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequirement {
    pub name: String,
    #[ts(type = "string")]
    pub quantity: Decimal,
    /// Σ quantity × unit price over every occurrence.
    pub estimated_cost: Money,
}

#[derive(Default)]
struct RequirementList {
    entries: Vec<MaterialRequirement>,
    by_name: HashMap<String, usize>,
}

impl RequirementList {
    fn add(
        &mut self,
        name: &str,
        quantity: Decimal,
        cost: Money,
        context: impl Fn() -> String,
    ) -> CoreResult<()> {
        match self.by_name.get(name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.quantity = entry
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| overflow(context()))?;
                entry.estimated_cost = entry
                    .estimated_cost
                    .checked_add(cost)
                    .ok_or_else(|| overflow(context()))?;
            }
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push(MaterialRequirement {
                    name: name.to_string(),
                    quantity,
                    estimated_cost: cost,
                });
            }
        }
        Ok(())
    }

    fn into_vec(self) -> Vec<MaterialRequirement> {
        self.entries
    }
}

fn overflow(context: String) -> CoreError {
    CoreError::AmountOverflow { context }
}

/// Materials consumed by the service kits of `items`.
///
/// Each sub-item counts `sub.quantity × line.quantity`. Hidden kits still
/// count: hiding only affects rendering. Lines are validated first, as in
/// [`compute_totals`](crate::pricing::compute_totals).
pub fn material_requirements(items: &[LineItem]) -> CoreResult<Vec<MaterialRequirement>> {
    validate_line_items(items)?;

    let mut list = RequirementList::default();
    for item in items {
        let line_qty = Decimal::from(item.quantity);
        let context = || format!("aggregating materials of line {}", item.id);
        for sub in item.sub_items() {
            let quantity = sub
                .quantity
                .checked_mul(line_qty)
                .ok_or_else(|| overflow(context()))?;
            let cost = sub
                .unit_price
                .checked_scale(quantity)
                .ok_or_else(|| overflow(context()))?;
            list.add(&sub.name, quantity, cost, context)?;
        }
    }
    Ok(list.into_vec())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKind, Percent};
    use rust_decimal_macros::dec;

    fn outlet() -> WorkCode {
        WorkCode::new("SAL-01", "Salida toma doble", "und")
            .with_component(Component::resource("Cable 12 AWG (m)", dec!(2.5), Money::from_units(3_200)))
            .with_component(Component::resource("Toma doble", dec!(1), Money::from_units(9_000)))
    }

    fn room() -> WorkCode {
        WorkCode::new("HAB-01", "Habitación completa", "und")
            .with_component(Component::work_code("SAL-01", dec!(4)))
            .with_component(Component::resource("Cable 12 AWG (m)", dec!(5), Money::from_units(3_200)))
            .with_component(Component::resource("Oficial electricista (h)", dec!(6), Money::from_units(15_000)))
    }

    fn house() -> WorkCode {
        WorkCode::new("CASA-01", "Casa dos habitaciones", "und")
            .with_component(Component::work_code("HAB-01", dec!(2)))
    }

    fn catalog() -> WorkCodeCatalog {
        vec![outlet(), room(), house()].into_iter().collect()
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut catalog = WorkCodeCatalog::new();
        catalog.insert(outlet()).unwrap();
        assert!(matches!(
            catalog.insert(outlet()),
            Err(ValidationError::Duplicate { .. })
        ));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_nested_costs_multiply_through_levels() {
        let resolved = catalog().resolve().unwrap();
        // 2.5 × 3200 + 9000
        assert_eq!(resolved.unit_cost("SAL-01").unwrap(), Money::from_units(17_000));
        // 4 × 17000 + 5 × 3200 + 6 × 15000
        assert_eq!(resolved.unit_cost("HAB-01").unwrap(), Money::from_units(174_000));
        assert_eq!(resolved.unit_cost("CASA-01").unwrap(), Money::from_units(348_000));
        assert!(matches!(
            resolved.unit_cost("NOPE"),
            Err(CoreError::WorkCodeNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_reference() {
        let catalog: WorkCodeCatalog = vec![room()].into_iter().collect();
        assert_eq!(
            catalog.resolve().unwrap_err(),
            CoreError::UnknownWorkCode {
                parent: "HAB-01".to_string(),
                missing: "SAL-01".to_string()
            }
        );
    }

    #[test]
    fn test_cycle_detection() {
        let a = WorkCode::new("A", "a", "und").with_component(Component::work_code("B", dec!(1)));
        let b = WorkCode::new("B", "b", "und").with_component(Component::work_code("C", dec!(1)));
        let c = WorkCode::new("C", "c", "und").with_component(Component::work_code("A", dec!(1)));
        let catalog: WorkCodeCatalog = vec![c, b, a].into_iter().collect();

        assert_eq!(
            catalog.resolve().unwrap_err(),
            CoreError::CyclicWorkCode {
                path: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let a = WorkCode::new("A", "a", "und").with_component(Component::work_code("A", dec!(1)));
        let catalog: WorkCodeCatalog = vec![a].into_iter().collect();
        assert_eq!(
            catalog.resolve().unwrap_err(),
            CoreError::CyclicWorkCode {
                path: vec!["A".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_shared_dependency_is_not_a_cycle() {
        // Diamond: D uses B and C, both use A
        let a = WorkCode::new("A", "a", "und")
            .with_component(Component::resource("x", dec!(1), Money::from_units(10)));
        let b = WorkCode::new("B", "b", "und").with_component(Component::work_code("A", dec!(2)));
        let c = WorkCode::new("C", "c", "und").with_component(Component::work_code("A", dec!(3)));
        let d = WorkCode::new("D", "d", "und")
            .with_component(Component::work_code("B", dec!(1)))
            .with_component(Component::work_code("C", dec!(1)));
        let resolved: ResolvedCatalog = vec![a, b, c, d]
            .into_iter()
            .collect::<WorkCodeCatalog>()
            .resolve()
            .unwrap();
        assert_eq!(resolved.unit_cost("D").unwrap(), Money::from_units(50));
    }

    #[test]
    fn test_negative_component_rejected() {
        let bad = WorkCode::new("X", "x", "und")
            .with_component(Component::resource("y", dec!(-1), Money::from_units(1)));
        let catalog: WorkCodeCatalog = vec![bad].into_iter().collect();
        assert!(matches!(
            catalog.resolve(),
            Err(CoreError::Validation(ValidationError::NegativeAmount { .. }))
        ));
    }

    #[test]
    fn test_material_requirements_flatten_and_merge() {
        let resolved = catalog().resolve().unwrap();
        let needs = resolved.material_requirements("CASA-01", dec!(1)).unwrap();

        let names: Vec<&str> = needs.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Cable 12 AWG (m)", "Toma doble", "Oficial electricista (h)"]
        );
        // 2 rooms × (4 outlets × 2.5 m + 5 m) = 30 m
        assert_eq!(needs[0].quantity, dec!(30));
        assert_eq!(needs[0].estimated_cost, Money::from_units(96_000));
        assert_eq!(needs[1].quantity, dec!(8));
        assert_eq!(needs[2].quantity, dec!(12));
    }

    #[test]
    fn test_shared_codes_are_expanded_once() {
        // Each level uses the one below twice: 2^60 units of "x" at the top
        let mut codes = vec![WorkCode::new("L0", "level 0", "und")
            .with_component(Component::resource("x", dec!(1), Money::from_units(1)))];
        for level in 1..=60 {
            let below = format!("L{}", level - 1);
            codes.push(
                WorkCode::new(format!("L{}", level), format!("level {}", level), "und")
                    .with_component(Component::work_code(below.clone(), dec!(1)))
                    .with_component(Component::work_code(below, dec!(1))),
            );
        }
        let resolved = codes.into_iter().collect::<WorkCodeCatalog>().resolve().unwrap();

        let needs = resolved.material_requirements("L60", dec!(1)).unwrap();
        let expected = Decimal::from(1_u64 << 60);
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].quantity, expected);
        assert_eq!(needs[0].estimated_cost, Money::new(expected));
        assert_eq!(resolved.unit_cost("L60").unwrap(), Money::new(expected));
    }

    #[test]
    fn test_nested_overflow_is_an_error() {
        let base = WorkCode::new("A", "a", "und")
            .with_component(Component::resource("x", dec!(1), Money::from_units(1_000_000_000)));
        let mid = WorkCode::new("B", "b", "und").with_component(Component::work_code("A", dec!(10_000_000_000)));
        let top = WorkCode::new("C", "c", "und").with_component(Component::work_code("B", dec!(10_000_000_000)));
        let catalog: WorkCodeCatalog = vec![base, mid, top].into_iter().collect();
        assert!(matches!(
            catalog.resolve(),
            Err(CoreError::AmountOverflow { .. })
        ));

        // Resolvable, but the requested quantity leaves the range
        let resolved: ResolvedCatalog = vec![outlet()].into_iter().collect::<WorkCodeCatalog>().resolve().unwrap();
        assert!(matches!(
            resolved.material_requirements("SAL-01", Decimal::MAX),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_to_line_item_rejects_oversized_cost() {
        let huge = WorkCode::new("X", "x", "und")
            .with_component(Component::resource("y", dec!(1_000_000), Money::from_units(10_000_000)));
        let resolved = vec![huge].into_iter().collect::<WorkCodeCatalog>().resolve().unwrap();
        assert!(matches!(
            resolved.to_line_item("X", 1, &QuoteModifiers::none()),
            Err(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
        assert!(matches!(
            catalog().resolve().unwrap().to_line_item("SAL-01", 0, &QuoteModifiers::none()),
            Err(CoreError::Validation(ValidationError::InvalidQuantity { .. }))
        ));
    }

    #[test]
    fn test_to_line_item() {
        let resolved = catalog().resolve().unwrap();
        let mut modifiers = QuoteModifiers::none();
        modifiers.aiu.admin = Percent::from_units(10);
        modifiers.aiu.profit = Percent::from_units(10);

        let line = resolved.to_line_item("HAB-01", 3, &modifiers).unwrap();
        assert_eq!(line.kind(), ItemKind::Service);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.supplier_unit_cost, Some(Money::from_units(174_000)));
        assert_eq!(line.sale_unit_price, Money::from_units(208_800));
        assert_eq!(line.work_code(), Some("HAB-01"));

        let subs = line.sub_items();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].name, "Salida toma doble");
        assert_eq!(subs[0].unit_price, Money::from_units(17_000));
        assert_eq!(subs[0].quantity, dec!(4));
    }

    #[test]
    fn test_quote_material_requirements_include_hidden_kits() {
        let modifiers = QuoteModifiers::none();
        let kit = vec![SubItem::new("Tubo PVC 1/2 (m)", dec!(3), Money::from_units(2_000))];
        let items = vec![
            LineItem::service("Acometida", 2, Money::from_units(1), &modifiers)
                .with_id("a")
                .with_sub_items(kit.clone()),
            LineItem::service("Acometida oculta", 1, Money::from_units(1), &modifiers)
                .with_id("b")
                .with_sub_items(kit)
                .hide_sub_items(true),
            LineItem::product("Breaker", 5, Money::from_units(1), &modifiers).with_id("c"),
        ];

        let needs = material_requirements(&items).unwrap();
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].quantity, dec!(9));
        assert_eq!(needs[0].estimated_cost, Money::from_units(18_000));
    }

    #[test]
    fn test_catalog_json() {
        let json = r#"{
            "SAL-01": {
                "code": "SAL-01",
                "description": "Salida",
                "components": [
                    { "quantity": "2", "resource": { "name": "Cable", "unitCost": "100" } }
                ]
            },
            "HAB-01": {
                "code": "HAB-01",
                "description": "Habitación",
                "unit": "und",
                "components": [ { "quantity": "3", "workCode": "SAL-01" } ]
            }
        }"#;
        let catalog: WorkCodeCatalog = serde_json::from_str(json).unwrap();
        let resolved = catalog.resolve().unwrap();
        assert_eq!(resolved.unit_cost("HAB-01").unwrap(), Money::from_units(600));
    }
}
