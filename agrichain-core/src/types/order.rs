//! Purchase orders
//!
//! An order is a purchase intent between a retailer and a supplier. It
//! is independent of the transfer log and never implies custody.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

/// Status a freshly created order starts in
pub const ORDER_STATUS_PROCESSING: &str = "Processing";

/// Terminal status; orders in any other status count as open
pub const ORDER_STATUS_DELIVERED: &str = "Delivered";

/// A purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub retailer_id: UserId,
    pub supplier_id: UserId,
    /// Number of items covered by the order
    pub items: u32,
    pub total_amount: f64,
    /// Free-form status progressing e.g. Processing -> Delivered
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether the order is still open relative to the given terminal status
    pub fn is_open(&self, terminal_status: &str) -> bool {
        self.status != terminal_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_open() {
        let mut order = Order {
            id: OrderId(1),
            retailer_id: UserId(1),
            supplier_id: UserId(2),
            items: 3,
            total_amount: 120.0,
            status: ORDER_STATUS_PROCESSING.to_string(),
            created_at: Utc::now(),
        };
        assert!(order.is_open(ORDER_STATUS_DELIVERED));
        order.status = ORDER_STATUS_DELIVERED.to_string();
        assert!(!order.is_open(ORDER_STATUS_DELIVERED));
    }
}
