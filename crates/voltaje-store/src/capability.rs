//! # Capability Traits
//!
//! Narrow async interfaces over the shared state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Consumer                 needs                                         │
//! │  ──────────────────────   ──────────────────────────────────────────    │
//! │  QuoteService             QuoteReader + QuoteWriter                     │
//! │  DashboardKpis            QuoteReader + InventoryReader + DocumentReader│
//! │  Stock intake (CLI/UI)    InventoryWriter                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Consumers take generic bounds on exactly the traits they use, so a
//! read-only view can never mutate and tests can stub a single capability.

use async_trait::async_trait;
use voltaje_core::{InventoryItem, QuoteStatus, TrackedDocument};

use crate::error::StoreResult;
use crate::record::QuoteRecord;

#[async_trait]
pub trait QuoteReader: Send + Sync {
    async fn get_quote(&self, id: &str) -> StoreResult<QuoteRecord>;

    /// All quotes in insertion order.
    async fn list_quotes(&self) -> StoreResult<Vec<QuoteRecord>>;
}

#[async_trait]
pub trait QuoteWriter: Send + Sync {
    /// Fails with `Duplicate` when the id or number is taken.
    async fn insert_quote(&self, record: QuoteRecord) -> StoreResult<()>;

    /// Replaces the record with the same id, provided the stored quote is
    /// still in `expected` status. The check and the write happen under one
    /// lock; a mismatch fails with `StatusConflict` and changes nothing.
    async fn update_quote_if(&self, record: QuoteRecord, expected: QuoteStatus) -> StoreResult<()>;
}

#[async_trait]
pub trait InventoryReader: Send + Sync {
    async fn list_inventory(&self) -> StoreResult<Vec<InventoryItem>>;
}

#[async_trait]
pub trait InventoryWriter: Send + Sync {
    /// Inserts or replaces the item with the same SKU.
    async fn upsert_inventory(&self, item: InventoryItem) -> StoreResult<()>;

    /// Adds `delta` (may be negative) to the stock of `sku`; returns the new level.
    async fn adjust_stock(&self, sku: &str, delta: i64) -> StoreResult<i64>;
}

#[async_trait]
pub trait DocumentReader: Send + Sync {
    async fn list_documents(&self) -> StoreResult<Vec<TrackedDocument>>;
}

#[async_trait]
pub trait DocumentWriter: Send + Sync {
    async fn insert_document(&self, document: TrackedDocument) -> StoreResult<()>;
}
