//! Storage layer
//!
//! Storage traits for the four record collections, injected into the
//! resolver and aggregators so the custody/statistics logic is
//! storage-agnostic and unit-testable without a live database.
//!
//! The transfer log is append-only: stores expose `append` and reads,
//! never an update or delete for log entries. Single-record write
//! atomicity is the only guarantee; concurrent writers are not
//! coordinated here.

pub mod memory;
pub mod sled;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::{Order, Product, ProductId, TransferLogEntry, User, UserId};

/// Transfer log storage
///
/// Queries return entries in unspecified order unless stated otherwise;
/// the log has no global sequence numbers, timestamps are the ordering
/// key.
#[async_trait]
pub trait TransferLogStore: Send + Sync {
    /// All entries where the holder appears on either side
    async fn find_by_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>>;

    /// All entries addressed to the holder
    async fn find_by_to_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>>;

    /// All entries originating from the holder
    async fn find_by_from_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>>;

    /// Full history for one product, timestamp ascending
    async fn find_by_product(&self, product: ProductId) -> CoreResult<Vec<TransferLogEntry>>;

    /// Whether any entry at all exists for the product
    async fn has_any_for_product(&self, product: ProductId) -> CoreResult<bool>;

    /// Append a new entry, assigning its id
    async fn append(&self, entry: NewTransferLogEntry) -> CoreResult<TransferLogEntry>;

    /// Total number of entries
    async fn count_entries(&self) -> CoreResult<u64>;
}

/// Entry payload before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewTransferLogEntry {
    pub product_id: ProductId,
    pub from_holder: Option<UserId>,
    pub to_holder: Option<UserId>,
    pub action: crate::types::TransferAction,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub confirmed: bool,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Product storage
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_product(&self, id: ProductId) -> CoreResult<Option<Product>>;

    async fn find_by_public_id(&self, public_id: Uuid) -> CoreResult<Option<Product>>;

    async fn find_by_farmer(&self, farmer: UserId) -> CoreResult<Vec<Product>>;

    async fn insert_product(&self, product: Product) -> CoreResult<()>;

    async fn count_products(&self) -> CoreResult<u64>;
}

/// Order storage
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders for a retailer, newest first; `limit = None` returns all
    async fn find_by_retailer(
        &self,
        retailer: UserId,
        limit: Option<usize>,
    ) -> CoreResult<Vec<Order>>;

    /// Orders for a retailer whose status differs from the terminal one
    async fn count_open_for_retailer(
        &self,
        retailer: UserId,
        terminal_status: &str,
    ) -> CoreResult<u64>;

    /// Append a new order, assigning its id
    async fn create_order(&self, order: NewOrder) -> CoreResult<Order>;

    async fn count_orders(&self) -> CoreResult<u64>;
}

/// Order payload before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub retailer_id: UserId,
    pub supplier_id: UserId,
    pub items: u32,
    pub total_amount: f64,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// User storage
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: UserId) -> CoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    async fn insert_user(&self, user: User) -> CoreResult<()>;

    async fn count_users(&self) -> CoreResult<u64>;
}

/// Everything the API layer needs from one backend
pub trait Store:
    TransferLogStore + ProductStore + OrderStore + UserStore + Send + Sync + 'static
{
}

impl<T> Store for T where T: TransferLogStore + ProductStore + OrderStore + UserStore + Send + Sync + 'static {}

pub use self::memory::MemoryStore;
pub use self::sled::SledStore;
