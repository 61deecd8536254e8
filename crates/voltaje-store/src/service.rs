//! # Quote Service
//!
//! Glue between the pricing engine and the quote store.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(quote)                                                            │
//! │     │                                                                   │
//! │     ├── 0. stored status must be Draft, else QuoteNotEditable          │
//! │     ├── 1. compute_totals(items, modifiers, quote.mode, policy)         │
//! │     │        └── invalid input? → error, store untouched                │
//! │     │                                                                   │
//! │     ├── 2. QuoteRecord { quote, subtotal, discount, tax, grand }        │
//! │     │                                                                   │
//! │     └── 3. write lock → replace, only if the stored status is still    │
//! │              the one read before pricing (else StatusConflict)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing never runs while a lock is held.

use tracing::{info, warn};
use voltaje_core::{CoreError, PricingPolicy, Quote, QuoteStatus, Totals, ValidationError};

use crate::capability::{QuoteReader, QuoteWriter};
use crate::error::StoreResult;
use crate::record::QuoteRecord;

/// Prices quotes and keeps their stored totals in sync.
#[derive(Debug, Clone)]
pub struct QuoteService<S> {
    store: S,
    policy: PricingPolicy,
}

impl<S> QuoteService<S>
where
    S: QuoteReader + QuoteWriter,
{
    pub fn new(store: S, policy: PricingPolicy) -> Self {
        QuoteService { store, policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Prices without touching the store.
    pub fn price(&self, quote: &Quote) -> StoreResult<Totals> {
        Ok(quote.totals(&self.policy)?)
    }

    fn priced_record(&self, quote: Quote) -> StoreResult<(QuoteRecord, Totals)> {
        let totals = match self.price(&quote) {
            Ok(totals) => totals,
            Err(err) => {
                warn!(quote_id = %quote.id, error = %err, "Quote failed to price");
                return Err(err);
            }
        };
        Ok((QuoteRecord::new(quote, &totals), totals))
    }

    /// Stores a new draft with freshly computed totals.
    pub async fn create(&self, quote: Quote) -> StoreResult<Totals> {
        if quote.status != QuoteStatus::Draft {
            return Err(CoreError::from(ValidationError::InvalidFormat {
                field: "quote status".to_string(),
                reason: format!("new quotes start as draft, got {}", quote.status),
            })
            .into());
        }

        let (record, totals) = self.priced_record(quote)?;
        let (id, number) = (record.id().to_string(), record.number().to_string());
        self.store.insert_quote(record).await?;
        info!(
            quote_id = %id,
            number = %number,
            grand_total = %totals.grand_total,
            "Created quote"
        );
        Ok(totals)
    }

    /// Re-prices an edited draft and writes the totals back.
    ///
    /// The stored record decides editability and status; whatever status the
    /// caller's copy carries is ignored.
    pub async fn save(&self, mut quote: Quote) -> StoreResult<Totals> {
        let stored = self.store.get_quote(&quote.id).await?.quote;
        if !stored.status.is_editable() {
            warn!(quote_id = %quote.id, status = %stored.status, "Rejected edit of locked quote");
            return Err(CoreError::QuoteNotEditable {
                quote_id: quote.id,
                status: stored.status,
            }
            .into());
        }
        quote.status = stored.status;
        quote.created_at = stored.created_at;

        let (record, totals) = self.priced_record(quote)?;
        let id = record.id().to_string();
        self.store.update_quote_if(record, stored.status).await?;
        info!(quote_id = %id, grand_total = %totals.grand_total, "Saved quote");
        Ok(totals)
    }

    pub async fn get(&self, id: &str) -> StoreResult<QuoteRecord> {
        self.store.get_quote(id).await
    }

    /// Moves a stored quote through its lifecycle.
    ///
    /// Totals are recomputed so the stored snapshot always matches the
    /// policy in force when the status changed. The write only lands if the
    /// quote is still in the status it was read in.
    pub async fn transition(&self, id: &str, next: QuoteStatus) -> StoreResult<QuoteRecord> {
        let mut quote = self.store.get_quote(id).await?.quote;
        let from = quote.status;
        quote.transition(next)?;

        let (record, _) = self.priced_record(quote)?;
        self.store.update_quote_if(record.clone(), from).await?;
        info!(quote_id = %id, from = %from, to = %next, "Quote status changed");
        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use voltaje_core::{LineItem, Money, Percent, PricingMode};

    fn service() -> QuoteService<MemoryStore> {
        QuoteService::new(MemoryStore::new(), PricingPolicy::default())
    }

    fn draft() -> Quote {
        let mut quote = Quote::new("COT-0042", "Edificio Mirador", PricingMode::QuoteLevelAiu);
        let mut modifiers = quote.modifiers;
        modifiers.global_discount = Percent::from_units(10);
        quote.set_modifiers(modifiers, true).unwrap();
        quote
            .add_item(LineItem::product("Tablero", 1, Money::from_units(100_000), &quote.modifiers).with_id("l1"))
            .unwrap();
        quote
    }

    #[tokio::test]
    async fn test_create_writes_back_totals() {
        let service = service();
        let quote = draft();
        let id = quote.id.clone();

        let totals = service.create(quote).await.unwrap();
        let stored = service.get(&id).await.unwrap();

        assert_eq!(totals.grand_total, Money::from_units(107_100));
        assert_eq!(stored.subtotal, totals.subtotal);
        assert_eq!(stored.discount_amount, Money::from_units(10_000));
        assert_eq!(stored.tax_amount, Money::from_units(17_100));
        assert_eq!(stored.grand_total, totals.grand_total);
    }

    #[tokio::test]
    async fn test_save_reprices() {
        let service = service();
        let mut quote = draft();
        service.create(quote.clone()).await.unwrap();

        quote
            .add_item(LineItem::product("Breaker", 2, Money::from_units(50_000), &quote.modifiers).with_id("l2"))
            .unwrap();
        let totals = service.save(quote.clone()).await.unwrap();

        let stored = service.get(&quote.id).await.unwrap();
        assert_eq!(stored.subtotal, Money::from_units(200_000));
        assert_eq!(stored.grand_total, totals.grand_total);
        assert_eq!(stored.quote.items.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_quote_leaves_store_untouched() {
        let service = service();
        let quote = draft();
        let id = quote.id.clone();
        service.create(quote.clone()).await.unwrap();

        let mut broken = quote;
        broken.items[0].quantity = 0;
        assert!(matches!(
            service.save(broken).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        ));
        assert_eq!(service.get(&id).await.unwrap().quote.items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_transition_flow() {
        let service = service();
        let quote = draft();
        let id = quote.id.clone();
        service.create(quote).await.unwrap();

        service.transition(&id, QuoteStatus::Sent).await.unwrap();
        let record = service.transition(&id, QuoteStatus::Approved).await.unwrap();
        assert_eq!(record.quote.status, QuoteStatus::Approved);
        assert_eq!(record.grand_total, Money::from_units(107_100));

        let err = service.transition(&id, QuoteStatus::Draft).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidStatusTransition { .. })
        ));
        assert_eq!(service.get(&id).await.unwrap().quote.status, QuoteStatus::Approved);
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_costless_per_line_quote() {
        let service = QuoteService::new(MemoryStore::new(), PricingPolicy::strict());
        let mut quote = Quote::new("COT-0100", "Cliente", PricingMode::PerLineAiu);
        quote
            .add_item(LineItem::service("Mano de obra", 1, Money::from_units(90_000), &quote.modifiers).with_id("m1"))
            .unwrap();

        assert!(matches!(
            service.create(quote).await,
            Err(StoreError::Core(CoreError::MissingCostBasis { .. }))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_create_fails_after_pricing() {
        let service = service();
        let quote = draft();
        let id = quote.id.clone();
        service.create(quote.clone()).await.unwrap();

        let mut again = quote;
        again.items[0].sale_unit_price = Money::from_units(1);
        assert!(matches!(
            service.create(again).await,
            Err(StoreError::Duplicate { .. })
        ));
        assert_eq!(service.get(&id).await.unwrap().grand_total, Money::from_units(107_100));
    }

    #[tokio::test]
    async fn test_create_requires_draft() {
        let service = service();
        let mut quote = draft();
        quote.status = QuoteStatus::Approved;
        let id = quote.id.clone();

        assert!(matches!(
            service.create(quote).await,
            Err(StoreError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. })))
        ));
        assert!(matches!(service.get(&id).await, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_save_rejects_locked_quote() {
        let service = service();
        let quote = draft();
        let id = quote.id.clone();
        service.create(quote.clone()).await.unwrap();
        service.transition(&id, QuoteStatus::Sent).await.unwrap();
        service.transition(&id, QuoteStatus::Approved).await.unwrap();

        // A stale draft copy with an extra line
        let mut stale = quote;
        stale
            .add_item(LineItem::product("Breaker", 2, Money::from_units(50_000), &stale.modifiers).with_id("l2"))
            .unwrap();

        assert!(matches!(
            service.save(stale).await,
            Err(StoreError::Core(CoreError::QuoteNotEditable {
                status: QuoteStatus::Approved,
                ..
            }))
        ));
        let stored = service.get(&id).await.unwrap();
        assert_eq!(stored.quote.status, QuoteStatus::Approved);
        assert_eq!(stored.quote.items.len(), 1);
        assert_eq!(stored.grand_total, Money::from_units(107_100));
    }

    #[tokio::test]
    async fn test_save_keeps_stored_status() {
        let service = service();
        let quote = draft();
        let id = quote.id.clone();
        service.create(quote.clone()).await.unwrap();

        let mut edited = quote;
        edited.status = QuoteStatus::Approved;
        service.save(edited).await.unwrap();
        assert_eq!(service.get(&id).await.unwrap().quote.status, QuoteStatus::Draft);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_transitions_have_one_winner() {
        for _ in 0..20 {
            let service = service();
            let quote = draft();
            let id = quote.id.clone();
            service.create(quote).await.unwrap();
            service.transition(&id, QuoteStatus::Sent).await.unwrap();

            let (approve, reject) = {
                let (a, b) = (service.clone(), service.clone());
                let (ida, idb) = (id.clone(), id.clone());
                (
                    tokio::spawn(async move { a.transition(&ida, QuoteStatus::Approved).await }),
                    tokio::spawn(async move { b.transition(&idb, QuoteStatus::Rejected).await }),
                )
            };
            let results = [approve.await.unwrap(), reject.await.unwrap()];

            let winners: Vec<QuoteStatus> = results
                .iter()
                .filter_map(|r| r.as_ref().ok().map(|record| record.quote.status))
                .collect();
            assert_eq!(winners.len(), 1);
            assert!(results.iter().any(|r| matches!(
                r,
                Err(StoreError::StatusConflict { .. })
                    | Err(StoreError::Core(CoreError::InvalidStatusTransition { .. }))
            )));
            assert_eq!(service.get(&id).await.unwrap().quote.status, winners[0]);
        }
    }
}
