//! Dashboard KPI aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use voltaje_core::{ExpirationStatus, Money, QuoteStatus, StockStatus};

use crate::capability::{DocumentReader, InventoryReader, QuoteReader};
use crate::error::StoreResult;

/// Counters shown on the back-office home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub critical_stock: usize,
    pub warning_stock: usize,
    pub expired_documents: usize,
    pub expiring_documents: usize,
    /// Quotes still open for negotiation (draft or sent).
    pub open_quotes: usize,
    /// Σ stored grand total of approved and in-execution quotes.
    pub committed_pipeline: Money,
}

impl DashboardKpis {
    /// Reads a snapshot of each collection and classifies it as of `now`.
    pub async fn collect<S>(store: &S, now: DateTime<Utc>) -> StoreResult<Self>
    where
        S: QuoteReader + InventoryReader + DocumentReader,
    {
        let mut kpis = DashboardKpis::default();

        for item in store.list_inventory().await? {
            match item.stock_status() {
                StockStatus::Critical => kpis.critical_stock += 1,
                StockStatus::Warning => kpis.warning_stock += 1,
                StockStatus::Ok => {}
            }
        }

        for document in store.list_documents().await? {
            match document.status(now) {
                ExpirationStatus::Expired => kpis.expired_documents += 1,
                ExpirationStatus::ExpiringSoon => kpis.expiring_documents += 1,
                ExpirationStatus::Ok => {}
            }
        }

        for record in store.list_quotes().await? {
            let status = record.quote.status;
            if status.is_committed() {
                kpis.committed_pipeline += record.grand_total;
            } else if status.is_editable() || status == QuoteStatus::Sent {
                kpis.open_quotes += 1;
            }
        }

        debug!(
            critical = kpis.critical_stock,
            expired = kpis.expired_documents,
            pipeline = %kpis.committed_pipeline,
            "Collected dashboard KPIs"
        );
        Ok(kpis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{DocumentWriter, InventoryWriter};
    use crate::memory::MemoryStore;
    use crate::service::QuoteService;
    use chrono::{Duration, TimeZone};
    use voltaje_core::{
        DocumentKind, InventoryItem, LineItem, PricingMode, PricingPolicy, Quote,
        TrackedDocument,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    async fn quote(service: &QuoteService<MemoryStore>, number: &str, price: i64, statuses: &[QuoteStatus]) {
        let mut quote = Quote::new(number, "Cliente", PricingMode::QuoteLevelAiu);
        quote
            .add_item(LineItem::product("Obra", 1, Money::from_units(price), &quote.modifiers).with_id("l1"))
            .unwrap();
        let id = quote.id.clone();
        service.create(quote).await.unwrap();
        for status in statuses {
            service.transition(&id, *status).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let kpis = DashboardKpis::collect(&MemoryStore::new(), now()).await.unwrap();
        assert_eq!(kpis, DashboardKpis::default());
    }

    #[tokio::test]
    async fn test_collect() {
        let store = MemoryStore::new();

        for item in [
            InventoryItem::new("A", "Cable", 10, 10),
            InventoryItem::new("B", "Breaker", 20, 10),
            InventoryItem::new("C", "Tubo", 21, 10),
            InventoryItem::new("D", "Caja", 0, 5),
        ] {
            store.upsert_inventory(item).await.unwrap();
        }

        for (owner, days) in [("KLM-123", -1), ("KLM-123", 0), ("JUAN", 29), ("JUAN", 30)] {
            store
                .insert_document(TrackedDocument::new(owner, DocumentKind::Soat, now() + Duration::days(days)))
                .await
                .unwrap();
        }

        let service = QuoteService::new(store.clone(), PricingPolicy::default());
        use QuoteStatus::*;
        quote(&service, "COT-1", 100_000, &[]).await;
        quote(&service, "COT-2", 100_000, &[Sent]).await;
        quote(&service, "COT-3", 100_000, &[Sent, Approved]).await;
        quote(&service, "COT-4", 200_000, &[Sent, Approved, InExecution]).await;
        quote(&service, "COT-5", 900_000, &[Sent, Approved, InExecution, Finalized]).await;
        quote(&service, "COT-6", 900_000, &[Sent, Rejected]).await;

        let kpis = DashboardKpis::collect(&store, now()).await.unwrap();
        assert_eq!(kpis.critical_stock, 2);
        assert_eq!(kpis.warning_stock, 1);
        assert_eq!(kpis.expired_documents, 1);
        assert_eq!(kpis.expiring_documents, 2);
        assert_eq!(kpis.open_quotes, 2);
        // (100000 + 200000) × 1.19 VAT
        assert_eq!(kpis.committed_pipeline, Money::from_units(357_000));
    }
}
