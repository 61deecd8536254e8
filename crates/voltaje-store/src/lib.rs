//! # voltaje-store: Shared State for Voltaje ERP
//!
//! This crate holds the back-office state (quotes, inventory, tracked
//! documents) and exposes it through narrow async capability traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Voltaje ERP Data Flow                            │
//! │                                                                         │
//! │  UI / CLI                                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   voltaje-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ QuoteService  │    │  Capability   │    │ MemoryStore  │  │   │
//! │  │   │ DashboardKpis │───►│    traits     │◄───│ Arc<RwLock>  │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  voltaje-core (pricing, lifecycle, classifiers)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`capability`] - Reader/writer traits per collection
//! - [`memory`] - In-memory implementation of every trait
//! - [`service`] - Quote pricing with totals write-back
//! - [`dashboard`] - KPI aggregation
//! - [`record`] - Stored quote shape
//! - [`error`] - Store error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod capability;
pub mod dashboard;
pub mod error;
pub mod memory;
pub mod record;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use capability::{
    DocumentReader, DocumentWriter, InventoryReader, InventoryWriter, QuoteReader, QuoteWriter,
};
pub use dashboard::DashboardKpis;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use record::QuoteRecord;
pub use service::QuoteService;
