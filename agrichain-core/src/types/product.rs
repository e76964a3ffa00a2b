//! Product records
//!
//! A product is created by a farmer and immutable thereafter except
//! administratively. The internal id keys the transfer log; the public
//! UUID is the only identifier exposed outside the system (printed on
//! labels, scanned for provenance lookups).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Internal product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product:{}", self.0)
    }
}

/// A tracked product (batch) in the supply chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Public opaque identifier, safe to embed in QR codes
    pub public_id: Uuid,
    /// Owning farmer
    pub farmer_id: UserId,
    pub crop_name: String,
    /// Unit price; absent or non-positive values contribute zero to sums
    pub price: Option<f64>,
    /// Quantity in the farmer's unit; same zero-contribution rule
    pub quantity: Option<f64>,
    pub harvest_date: NaiveDate,
}

impl Product {
    /// Price x quantity, or 0.0 when either is missing or non-positive.
    ///
    /// Missing data on a product is never an error for the dashboard
    /// aggregators; it just contributes nothing.
    pub fn gross_value(&self) -> f64 {
        match (self.price, self.quantity) {
            (Some(p), Some(q)) if p > 0.0 && q > 0.0 => p * q,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Option<f64>, quantity: Option<f64>) -> Product {
        Product {
            id: ProductId(1),
            public_id: Uuid::new_v4(),
            farmer_id: UserId(1),
            crop_name: "Wheat".to_string(),
            price,
            quantity,
            harvest_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_gross_value() {
        assert_eq!(product(Some(40.0), Some(25.0)).gross_value(), 1000.0);
    }

    #[test]
    fn test_gross_value_guards() {
        assert_eq!(product(None, Some(10.0)).gross_value(), 0.0);
        assert_eq!(product(Some(10.0), None).gross_value(), 0.0);
        assert_eq!(product(Some(0.0), Some(10.0)).gross_value(), 0.0);
        assert_eq!(product(Some(-5.0), Some(10.0)).gross_value(), 0.0);
        assert_eq!(product(Some(10.0), Some(-1.0)).gross_value(), 0.0);
    }
}
