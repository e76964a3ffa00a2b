//! AgriChain Core - Supply Chain Domain Logic
//!
//! Domain model and storage layer for the farm-to-retail tracking
//! service. Everything downstream of the HTTP surface lives here:
//! typed records, the append-only transfer log, and the read models
//! derived from it.
//!
//! # Architecture
//!
//! - **Types**: Strongly typed records for users, products, orders and
//!   transfer log entries
//! - **Storage**: Async store traits with in-memory and sled-backed
//!   implementations
//! - **Ownership**: Custody resolution over the transfer log
//! - **Provenance**: Full chain reconstruction by public product id
//! - **Stats**: Dashboard aggregators for farmer, retailer and admin
//!   views
//!
//! # Custody Model
//!
//! Custody is never stored directly. The transfer log is the source of
//! truth: for each product the latest confirmed entry involving a
//! holder decides whether the holder still has it. Pending entries
//! surface as incoming shipments and never establish custody.
//!
//! ```rust
//! use std::sync::Arc;
//! use agrichain_core::storage::MemoryStore;
//! use agrichain_core::ownership::OwnershipResolver;
//! use agrichain_core::types::UserId;
//!
//! async fn example() {
//!     let store = Arc::new(MemoryStore::new());
//!     let resolver = OwnershipResolver::new(store);
//!     let held = resolver.held_products(UserId(1)).await.unwrap();
//!     assert!(held.is_empty());
//! }
//! ```

pub mod error;
pub mod ownership;
pub mod provenance;
pub mod stats;
pub mod storage;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use ownership::OwnershipResolver;
pub use provenance::{Provenance, ProvenanceAssembler};
pub use stats::{
    AdminOverviewAggregator, FarmerStatsAggregator, RetailerStatsAggregator, StatsConfig,
};
pub use storage::{MemoryStore, SledStore, Store};
pub use types::{
    Order, OrderId, Product, ProductId, Role, TransferAction, TransferLogEntry, User, UserId,
};
