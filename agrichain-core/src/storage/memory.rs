//! In-memory storage
//!
//! Thread-safe in-memory implementation of the store traits, used by
//! tests and as the default development backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewOrder, NewTransferLogEntry, OrderStore, ProductStore, TransferLogStore, UserStore};
use crate::error::CoreResult;
use crate::types::{LogId, Order, OrderId, Product, ProductId, TransferLogEntry, User, UserId};

/// In-memory store
///
/// All collections behind `RwLock`ed maps; ids from atomic counters.
#[derive(Debug, Default)]
pub struct MemoryStore {
    logs: Arc<RwLock<HashMap<LogId, TransferLogEntry>>>,
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    users: Arc<RwLock<HashMap<UserId, User>>>,
    next_log_id: AtomicU64,
    next_order_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all collections
    pub async fn clear(&self) {
        self.logs.write().await.clear();
        self.products.write().await.clear();
        self.orders.write().await.clear();
        self.users.write().await.clear();
    }
}

#[async_trait]
impl TransferLogStore for MemoryStore {
    async fn find_by_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        let logs = self.logs.read().await;
        Ok(logs
            .values()
            .filter(|e| e.from_holder == Some(holder) || e.to_holder == Some(holder))
            .cloned()
            .collect())
    }

    async fn find_by_to_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        let logs = self.logs.read().await;
        Ok(logs
            .values()
            .filter(|e| e.to_holder == Some(holder))
            .cloned()
            .collect())
    }

    async fn find_by_from_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        let logs = self.logs.read().await;
        Ok(logs
            .values()
            .filter(|e| e.from_holder == Some(holder))
            .cloned()
            .collect())
    }

    async fn find_by_product(&self, product: ProductId) -> CoreResult<Vec<TransferLogEntry>> {
        let logs = self.logs.read().await;
        let mut entries: Vec<_> = logs
            .values()
            .filter(|e| e.product_id == product)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }

    async fn has_any_for_product(&self, product: ProductId) -> CoreResult<bool> {
        let logs = self.logs.read().await;
        Ok(logs.values().any(|e| e.product_id == product))
    }

    async fn append(&self, entry: NewTransferLogEntry) -> CoreResult<TransferLogEntry> {
        let id = LogId(self.next_log_id.fetch_add(1, Ordering::SeqCst) + 1);
        let entry = TransferLogEntry {
            id,
            product_id: entry.product_id,
            from_holder: entry.from_holder,
            to_holder: entry.to_holder,
            action: entry.action,
            timestamp: entry.timestamp,
            confirmed: entry.confirmed,
            location: entry.location,
            notes: entry.notes,
            created_by: entry.created_by,
        };
        self.logs.write().await.insert(id, entry.clone());
        Ok(entry)
    }

    async fn count_entries(&self) -> CoreResult<u64> {
        Ok(self.logs.read().await.len() as u64)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get_product(&self, id: ProductId) -> CoreResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_by_public_id(&self, public_id: Uuid) -> CoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.values().find(|p| p.public_id == public_id).cloned())
    }

    async fn find_by_farmer(&self, farmer: UserId) -> CoreResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut found: Vec<_> = products
            .values()
            .filter(|p| p.farmer_id == farmer)
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn insert_product(&self, product: Product) -> CoreResult<()> {
        self.products.write().await.insert(product.id, product);
        Ok(())
    }

    async fn count_products(&self) -> CoreResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn find_by_retailer(
        &self,
        retailer: UserId,
        limit: Option<usize>,
    ) -> CoreResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut found: Vec<_> = orders
            .values()
            .filter(|o| o.retailer_id == retailer)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn count_open_for_retailer(
        &self,
        retailer: UserId,
        terminal_status: &str,
    ) -> CoreResult<u64> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|o| o.retailer_id == retailer && o.is_open(terminal_status))
            .count() as u64)
    }

    async fn create_order(&self, order: NewOrder) -> CoreResult<Order> {
        let id = OrderId(self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1);
        let order = Order {
            id,
            retailer_id: order.retailer_id,
            supplier_id: order.supplier_id,
            items: order.items,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
        };
        self.orders.write().await.insert(id, order.clone());
        Ok(order)
    }

    async fn count_orders(&self) -> CoreResult<u64> {
        Ok(self.orders.read().await.len() as u64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: UserId) -> CoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: User) -> CoreResult<()> {
        self.users.write().await.insert(user.id, user);
        Ok(())
    }

    async fn count_users(&self) -> CoreResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferAction;
    use chrono::{TimeZone, Utc};

    fn new_entry(product: u64, from: Option<u64>, to: Option<u64>, day: u32) -> NewTransferLogEntry {
        NewTransferLogEntry {
            product_id: ProductId(product),
            from_holder: from.map(UserId),
            to_holder: to.map(UserId),
            action: TransferAction::Shipped,
            timestamp: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            confirmed: true,
            location: None,
            notes: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.append(new_entry(1, None, Some(1), 1)).await.unwrap();
        let b = store.append(new_entry(1, Some(1), Some(2), 2)).await.unwrap();
        assert_eq!(a.id, LogId(1));
        assert_eq!(b.id, LogId(2));
        assert_eq!(store.count_entries().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_by_product_sorted_ascending() {
        let store = MemoryStore::new();
        store.append(new_entry(1, Some(1), Some(2), 9)).await.unwrap();
        store.append(new_entry(1, None, Some(1), 1)).await.unwrap();
        store.append(new_entry(2, None, Some(1), 3)).await.unwrap();

        let entries = store.find_by_product(ProductId(1)).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[tokio::test]
    async fn test_find_by_holder_covers_both_directions() {
        let store = MemoryStore::new();
        store.append(new_entry(1, None, Some(7), 1)).await.unwrap();
        store.append(new_entry(1, Some(7), Some(8), 2)).await.unwrap();
        store.append(new_entry(2, Some(3), Some(4), 2)).await.unwrap();

        let entries = store.find_by_holder(UserId(7)).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_orders_newest_first_with_limit() {
        let store = MemoryStore::new();
        for day in 1..=8u32 {
            store
                .create_order(NewOrder {
                    retailer_id: UserId(1),
                    supplier_id: UserId(2),
                    items: day,
                    total_amount: day as f64 * 10.0,
                    status: "Processing".to_string(),
                    created_at: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
                })
                .await
                .unwrap();
        }

        let recent = store.find_by_retailer(UserId(1), Some(5)).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].items, 8);
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let all = store.find_by_retailer(UserId(1), None).await.unwrap();
        assert_eq!(all.len(), 8);
    }

    #[tokio::test]
    async fn test_count_open_orders() {
        let store = MemoryStore::new();
        for status in ["Processing", "Shipped", "Delivered"] {
            store
                .create_order(NewOrder {
                    retailer_id: UserId(1),
                    supplier_id: UserId(2),
                    items: 1,
                    total_amount: 10.0,
                    status: status.to_string(),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let open = store
            .count_open_for_retailer(UserId(1), "Delivered")
            .await
            .unwrap();
        assert_eq!(open, 2);
    }
}
