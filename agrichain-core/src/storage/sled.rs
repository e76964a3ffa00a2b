//! Sled persistent storage
//!
//! Embedded-database implementation of the store traits. One tree per
//! collection with JSON-serialized records under big-endian id keys,
//! plus index trees for the two secondary lookups (public product id,
//! user email). Log and order ids come from the sled id generator, so
//! appends are single-record atomic and ids monotonic.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::{NewOrder, NewTransferLogEntry, OrderStore, ProductStore, TransferLogStore, UserStore};
use crate::error::{CoreError, CoreResult};
use crate::types::{LogId, Order, OrderId, Product, ProductId, TransferLogEntry, User, UserId};

const LOGS_TREE: &str = "transfer_logs";
const PRODUCTS_TREE: &str = "products";
const ORDERS_TREE: &str = "orders";
const USERS_TREE: &str = "users";
const PRODUCT_PUBLIC_INDEX_TREE: &str = "product_public_index";
const USER_EMAIL_INDEX_TREE: &str = "user_email_index";

/// Sled-backed store
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    logs: sled::Tree,
    products: sled::Tree,
    orders: sled::Tree,
    users: sled::Tree,
    product_public_index: sled::Tree,
    user_email_index: sled::Tree,
}

impl SledStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let db = sled::open(path)
            .map_err(|e| CoreError::Storage(format!("Failed to open sled db: {}", e)))?;

        let logs = db
            .open_tree(LOGS_TREE)
            .map_err(|e| CoreError::Storage(format!("Failed to open logs tree: {}", e)))?;
        let products = db
            .open_tree(PRODUCTS_TREE)
            .map_err(|e| CoreError::Storage(format!("Failed to open products tree: {}", e)))?;
        let orders = db
            .open_tree(ORDERS_TREE)
            .map_err(|e| CoreError::Storage(format!("Failed to open orders tree: {}", e)))?;
        let users = db
            .open_tree(USERS_TREE)
            .map_err(|e| CoreError::Storage(format!("Failed to open users tree: {}", e)))?;
        let product_public_index = db
            .open_tree(PRODUCT_PUBLIC_INDEX_TREE)
            .map_err(|e| CoreError::Storage(format!("Failed to open product index tree: {}", e)))?;
        let user_email_index = db
            .open_tree(USER_EMAIL_INDEX_TREE)
            .map_err(|e| CoreError::Storage(format!("Failed to open email index tree: {}", e)))?;

        Ok(Self {
            db,
            logs,
            products,
            orders,
            users,
            product_public_index,
            user_email_index,
        })
    }

    /// Flush to disk
    pub fn flush(&self) -> CoreResult<()> {
        self.db
            .flush()
            .map_err(|e| CoreError::Storage(format!("Failed to flush db: {}", e)))?;
        Ok(())
    }

    fn serialize<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> CoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    fn next_id(&self) -> CoreResult<u64> {
        // sled ids start at 0; record ids start at 1
        self.db
            .generate_id()
            .map(|id| id + 1)
            .map_err(|e| CoreError::Storage(format!("Failed to generate id: {}", e)))
    }

    fn scan<T, F>(tree: &sled::Tree, what: &str, mut keep: F) -> CoreResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let mut out = Vec::new();
        for item in tree.iter() {
            let (_, value) =
                item.map_err(|e| CoreError::Storage(format!("Failed to scan {}: {}", what, e)))?;
            let record: T = Self::deserialize(&value)?;
            if keep(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl TransferLogStore for SledStore {
    async fn find_by_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        Self::scan(&self.logs, "logs", |e: &TransferLogEntry| {
            e.from_holder == Some(holder) || e.to_holder == Some(holder)
        })
    }

    async fn find_by_to_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        Self::scan(&self.logs, "logs", |e: &TransferLogEntry| {
            e.to_holder == Some(holder)
        })
    }

    async fn find_by_from_holder(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        Self::scan(&self.logs, "logs", |e: &TransferLogEntry| {
            e.from_holder == Some(holder)
        })
    }

    async fn find_by_product(&self, product: ProductId) -> CoreResult<Vec<TransferLogEntry>> {
        let mut entries = Self::scan(&self.logs, "logs", |e: &TransferLogEntry| {
            e.product_id == product
        })?;
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }

    async fn has_any_for_product(&self, product: ProductId) -> CoreResult<bool> {
        for item in self.logs.iter() {
            let (_, value) =
                item.map_err(|e| CoreError::Storage(format!("Failed to scan logs: {}", e)))?;
            let entry: TransferLogEntry = Self::deserialize(&value)?;
            if entry.product_id == product {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn append(&self, entry: NewTransferLogEntry) -> CoreResult<TransferLogEntry> {
        let id = LogId(self.next_id()?);
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
        let value = Self::serialize(&entry)?;
        self.logs
            .insert(id.0.to_be_bytes(), value)
            .map_err(|e| CoreError::Storage(format!("Failed to append log entry: {}", e)))?;
        Ok(entry)
    }

    async fn count_entries(&self) -> CoreResult<u64> {
        Ok(self.logs.len() as u64)
    }
}

#[async_trait]
impl ProductStore for SledStore {
    async fn get_product(&self, id: ProductId) -> CoreResult<Option<Product>> {
        let found = self
            .products
            .get(id.0.to_be_bytes())
            .map_err(|e| CoreError::Storage(format!("Failed to get product: {}", e)))?;
        found.map(|v| Self::deserialize(&v)).transpose()
    }

    async fn find_by_public_id(&self, public_id: Uuid) -> CoreResult<Option<Product>> {
        let id_bytes = self
            .product_public_index
            .get(public_id.as_bytes())
            .map_err(|e| CoreError::Storage(format!("Failed to read product index: {}", e)))?;
        match id_bytes {
            Some(bytes) => {
                let found = self
                    .products
                    .get(&bytes)
                    .map_err(|e| CoreError::Storage(format!("Failed to get product: {}", e)))?;
                found.map(|v| Self::deserialize(&v)).transpose()
            }
            None => Ok(None),
        }
    }

    async fn find_by_farmer(&self, farmer: UserId) -> CoreResult<Vec<Product>> {
        let mut found = Self::scan(&self.products, "products", |p: &Product| {
            p.farmer_id == farmer
        })?;
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn insert_product(&self, product: Product) -> CoreResult<()> {
        let key = product.id.0.to_be_bytes();
        let value = Self::serialize(&product)?;
        self.products
            .insert(key, value)
            .map_err(|e| CoreError::Storage(format!("Failed to insert product: {}", e)))?;
        self.product_public_index
            .insert(product.public_id.as_bytes(), &key)
            .map_err(|e| CoreError::Storage(format!("Failed to index product: {}", e)))?;
        Ok(())
    }

    async fn count_products(&self) -> CoreResult<u64> {
        Ok(self.products.len() as u64)
    }
}

#[async_trait]
impl OrderStore for SledStore {
    async fn find_by_retailer(
        &self,
        retailer: UserId,
        limit: Option<usize>,
    ) -> CoreResult<Vec<Order>> {
        let mut found = Self::scan(&self.orders, "orders", |o: &Order| {
            o.retailer_id == retailer
        })?;
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
        let open = Self::scan(&self.orders, "orders", |o: &Order| {
            o.retailer_id == retailer && o.is_open(terminal_status)
        })?;
        Ok(open.len() as u64)
    }

    async fn create_order(&self, order: NewOrder) -> CoreResult<Order> {
        let id = OrderId(self.next_id()?);
        let order = Order {
            id,
            retailer_id: order.retailer_id,
            supplier_id: order.supplier_id,
            items: order.items,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
        };
        let value = Self::serialize(&order)?;
        self.orders
            .insert(id.0.to_be_bytes(), value)
            .map_err(|e| CoreError::Storage(format!("Failed to append order: {}", e)))?;
        Ok(order)
    }

    async fn count_orders(&self) -> CoreResult<u64> {
        Ok(self.orders.len() as u64)
    }
}

#[async_trait]
impl UserStore for SledStore {
    async fn get_user(&self, id: UserId) -> CoreResult<Option<User>> {
        let found = self
            .users
            .get(id.0.to_be_bytes())
            .map_err(|e| CoreError::Storage(format!("Failed to get user: {}", e)))?;
        found.map(|v| Self::deserialize(&v)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let id_bytes = self
            .user_email_index
            .get(email.as_bytes())
            .map_err(|e| CoreError::Storage(format!("Failed to read email index: {}", e)))?;
        match id_bytes {
            Some(bytes) => {
                let found = self
                    .users
                    .get(&bytes)
                    .map_err(|e| CoreError::Storage(format!("Failed to get user: {}", e)))?;
                found.map(|v| Self::deserialize(&v)).transpose()
            }
            None => Ok(None),
        }
    }

    async fn insert_user(&self, user: User) -> CoreResult<()> {
        let key = user.id.0.to_be_bytes();
        let email = user.email.clone();
        let value = Self::serialize(&user)?;
        self.users
            .insert(key, value)
            .map_err(|e| CoreError::Storage(format!("Failed to insert user: {}", e)))?;
        self.user_email_index
            .insert(email.as_bytes(), &key)
            .map_err(|e| CoreError::Storage(format!("Failed to index user: {}", e)))?;
        Ok(())
    }

    async fn count_users(&self) -> CoreResult<u64> {
        Ok(self.users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, TransferAction};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn open_temp() -> (SledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_log_append_and_product_history() {
        let (store, _dir) = open_temp();

        for day in [3u32, 1, 2] {
            store
                .append(NewTransferLogEntry {
                    product_id: ProductId(1),
                    from_holder: None,
                    to_holder: Some(UserId(1)),
                    action: TransferAction::Created,
                    timestamp: Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap(),
                    confirmed: true,
                    location: None,
                    notes: None,
                    created_by: None,
                })
                .await
                .unwrap();
        }

        let history = store.find_by_product(ProductId(1)).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(store.has_any_for_product(ProductId(1)).await.unwrap());
        assert!(!store.has_any_for_product(ProductId(9)).await.unwrap());
    }

    #[tokio::test]
    async fn test_product_public_id_index() {
        let (store, _dir) = open_temp();
        let public_id = Uuid::new_v4();
        store
            .insert_product(Product {
                id: ProductId(5),
                public_id,
                farmer_id: UserId(1),
                crop_name: "Rice".to_string(),
                price: Some(30.0),
                quantity: Some(50.0),
                harvest_date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
            })
            .await
            .unwrap();

        let found = store.find_by_public_id(public_id).await.unwrap().unwrap();
        assert_eq!(found.id, ProductId(5));
        assert!(store
            .find_by_public_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_user_email_index() {
        let (store, _dir) = open_temp();
        store
            .insert_user(User {
                id: UserId(2),
                email: "shop@example.com".to_string(),
                name: "Shop".to_string(),
                role: Role::Retailer,
            })
            .await
            .unwrap();

        let found = store.find_by_email("shop@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, UserId(2));
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
