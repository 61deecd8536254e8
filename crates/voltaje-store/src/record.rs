//! Persisted quote shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voltaje_core::{Money, Quote, Totals};

/// A quote as stored, with the monetary fields of its last pricing run.
///
/// The amounts are a snapshot: they are only correct as of `priced_at` and
/// are refreshed by [`QuoteService`](crate::QuoteService) on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub quote: Quote,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_amount: Money,
    pub grand_total: Money,
    pub priced_at: DateTime<Utc>,
}

impl QuoteRecord {
    pub fn new(quote: Quote, totals: &Totals) -> Self {
        QuoteRecord {
            quote,
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            tax_amount: totals.tax_amount,
            grand_total: totals.grand_total,
            priced_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.quote.id
    }

    pub fn number(&self) -> &str {
        &self.quote.number
    }
}
