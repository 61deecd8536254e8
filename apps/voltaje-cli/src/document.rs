//! Quote documents read from disk.
//!
//! ```json
//! {
//!   "mode": "per_line_aiu",
//!   "modifiers": { "globalDiscount": "5", "globalTax": "19", "aiu": { "profit": "10" } },
//!   "items": [
//!     { "id": "l1", "description": "Breaker 20A", "quantity": 2,
//!       "saleUnitPrice": "38000", "kind": "PRODUCT" }
//!   ]
//! }
//! ```
//!
//! Lines that carry no `aiu` object inherit the quote's AIU rates, matching
//! how the editor stamps new lines.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use voltaje_core::{LineItem, PricingMode, QuoteModifiers};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDocument {
    pub modifiers: QuoteModifiers,
    pub items: Vec<LineItem>,
    pub mode: Option<PricingMode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    modifiers: QuoteModifiers,
    #[serde(default)]
    items: Vec<serde_json::Value>,
    #[serde(default)]
    mode: Option<PricingMode>,
}

impl QuoteDocument {
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let input_error = |message: String| CliError::Input {
            path: path.to_path_buf(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| input_error(e.to_string()))?;
        let document = Self::from_json(&contents).map_err(|e| input_error(e.to_string()))?;
        debug!(?path, items = document.items.len(), "Loaded quote document");
        Ok(document)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawDocument = serde_json::from_str(json)?;

        let mut items = Vec::with_capacity(raw.items.len());
        for value in raw.items {
            let inherits_aiu = value.get("aiu").is_none();
            let mut item: LineItem = serde_json::from_value(value)?;
            if inherits_aiu {
                item.aiu = raw.modifiers.aiu;
            }
            items.push(item);
        }

        Ok(QuoteDocument {
            modifiers: raw.modifiers,
            items,
            mode: raw.mode,
        })
    }

    /// `--mode` wins over the document, which wins over the configured default.
    pub fn effective_mode(&self, flag: Option<PricingMode>, default: PricingMode) -> PricingMode {
        flag.or(self.mode).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use voltaje_core::{ItemKind, Percent};

    const DOC: &str = r#"{
        "modifiers": {
            "globalDiscount": "5",
            "aiu": { "admin": "8", "contingency": "2", "profit": "10" }
        },
        "items": [
            { "id": "p1", "description": "Breaker", "quantity": 2,
              "saleUnitPrice": "38000", "kind": "PRODUCT" },
            { "id": "s1", "description": "Salida", "quantity": 1,
              "saleUnitPrice": "85000", "kind": "SERVICE",
              "aiu": { "profit": "20" },
              "subItems": [{ "name": "Cable", "quantity": "2.5", "unitPrice": "3200" }] }
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let doc = QuoteDocument::from_json(DOC).unwrap();
        assert_eq!(doc.mode, None);
        assert_eq!(doc.modifiers.global_discount, Percent::from_units(5));
        // Omitted globalTax keeps the 19% default
        assert_eq!(doc.modifiers.global_tax, Percent::from_units(19));
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[1].kind(), ItemKind::Service);
        assert_eq!(doc.items[1].sub_items()[0].quantity, dec!(2.5));
    }

    #[test]
    fn test_lines_inherit_quote_aiu() {
        let doc = QuoteDocument::from_json(DOC).unwrap();
        assert_eq!(doc.items[0].aiu, doc.modifiers.aiu);
        assert_eq!(doc.items[1].aiu.profit, Percent::from_units(20));
        assert_eq!(doc.items[1].aiu.admin, Percent::zero());
    }

    #[test]
    fn test_mode_precedence() {
        let mut doc = QuoteDocument::from_json(r#"{ "items": [] }"#).unwrap();
        assert_eq!(
            doc.effective_mode(None, PricingMode::PerLineAiu),
            PricingMode::PerLineAiu
        );

        doc.mode = Some(PricingMode::QuoteLevelAiu);
        assert_eq!(
            doc.effective_mode(None, PricingMode::PerLineAiu),
            PricingMode::QuoteLevelAiu
        );
        assert_eq!(
            doc.effective_mode(Some(PricingMode::PerLineAiu), PricingMode::QuoteLevelAiu),
            PricingMode::PerLineAiu
        );
    }

    #[test]
    fn test_malformed_documents() {
        assert!(QuoteDocument::from_json("not json").is_err());
        assert!(QuoteDocument::from_json(r#"{ "items": [{ "id": "x" }] }"#).is_err());
        assert!(QuoteDocument::from_json(r#"{ "mode": "c", "items": [] }"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = QuoteDocument::from_path(Path::new("/nonexistent/quote.json")).unwrap_err();
        assert!(matches!(err, CliError::Input { .. }));
    }
}
