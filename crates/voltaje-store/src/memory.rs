//! # In-Memory Store
//!
//! Process-local implementation of every capability trait.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MemoryStore (Clone)                                                    │
//! │       │                                                                 │
//! │       └── Arc<RwLock<StoreState>>                                       │
//! │               ├── read()  : any number of concurrent readers            │
//! │               └── write() : one writer, no readers                      │
//! │                                                                         │
//! │  Readers get owned clones, so no guard outlives a method call.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use voltaje_core::{InventoryItem, QuoteStatus, TrackedDocument};

use crate::capability::{
    DocumentReader, DocumentWriter, InventoryReader, InventoryWriter, QuoteReader, QuoteWriter,
};
use crate::error::{StoreError, StoreResult};
use crate::record::QuoteRecord;

#[derive(Debug, Default)]
struct StoreState {
    quotes: Vec<QuoteRecord>,
    /// Keyed by SKU.
    inventory: BTreeMap<String, InventoryItem>,
    documents: Vec<TrackedDocument>,
}

/// Cloneable handle to the shared back-office state.
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::new();
///
/// store.upsert_inventory(InventoryItem::new("CBL-12", "Cable 12 AWG", 40, 20)).await?;
/// assert_eq!(store.adjust_stock("CBL-12", -15).await?, 25);
///
/// // Hand out only what a consumer needs
/// let kpis = DashboardKpis::collect(&store, Utc::now()).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteReader for MemoryStore {
    async fn get_quote(&self, id: &str) -> StoreResult<QuoteRecord> {
        let state = self.state.read().await;
        state
            .quotes
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Quote", id))
    }

    async fn list_quotes(&self) -> StoreResult<Vec<QuoteRecord>> {
        Ok(self.state.read().await.quotes.clone())
    }
}

#[async_trait]
impl QuoteWriter for MemoryStore {
    async fn insert_quote(&self, record: QuoteRecord) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.quotes.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::duplicate("quote id", record.id()));
        }
        if state.quotes.iter().any(|r| r.number() == record.number()) {
            return Err(StoreError::duplicate("quote number", record.number()));
        }

        debug!(quote_id = %record.id(), number = %record.number(), "Inserting quote");
        state.quotes.push(record);
        Ok(())
    }

    async fn update_quote_if(&self, record: QuoteRecord, expected: QuoteStatus) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .quotes
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::not_found("Quote", record.id()))?;

        if slot.quote.status != expected {
            return Err(StoreError::StatusConflict {
                id: record.id().to_string(),
                expected,
                found: slot.quote.status,
            });
        }

        debug!(quote_id = %record.id(), status = %record.quote.status, "Updating quote");
        *slot = record;
        Ok(())
    }
}

#[async_trait]
impl InventoryReader for MemoryStore {
    async fn list_inventory(&self) -> StoreResult<Vec<InventoryItem>> {
        Ok(self.state.read().await.inventory.values().cloned().collect())
    }
}

#[async_trait]
impl InventoryWriter for MemoryStore {
    async fn upsert_inventory(&self, item: InventoryItem) -> StoreResult<()> {
        let mut state = self.state.write().await;
        debug!(sku = %item.sku, current = item.current_qty, min = item.min_qty, "Upserting inventory item");
        state.inventory.insert(item.sku.clone(), item);
        Ok(())
    }

    async fn adjust_stock(&self, sku: &str, delta: i64) -> StoreResult<i64> {
        let mut state = self.state.write().await;
        let item = state
            .inventory
            .get_mut(sku)
            .ok_or_else(|| StoreError::not_found("Inventory item", sku))?;

        item.current_qty = item.current_qty.saturating_add(delta);
        debug!(sku = %sku, delta, current = item.current_qty, "Adjusted stock");
        Ok(item.current_qty)
    }
}

#[async_trait]
impl DocumentReader for MemoryStore {
    async fn list_documents(&self) -> StoreResult<Vec<TrackedDocument>> {
        Ok(self.state.read().await.documents.clone())
    }
}

#[async_trait]
impl DocumentWriter for MemoryStore {
    async fn insert_document(&self, document: TrackedDocument) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.documents.iter().any(|d| d.id == document.id) {
            return Err(StoreError::duplicate("document id", document.id));
        }
        debug!(owner = %document.owner, kind = ?document.kind, "Tracking document");
        state.documents.push(document);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
