//! API Data Transfer Objects
//!
//! Request and response bodies for the REST surface. Responses use
//! camelCase field names; requests from the order form arrive
//! loosely typed (numbers or numeric strings) and are parsed here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrichain_core::types::{Order, Product, TransferAction, TransferLogEntry};
use agrichain_core::Provenance;

use crate::error::ApiError;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Request body for selling a held product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    /// Public product identifier
    pub product_id: Uuid,
}

/// Response after a sale is recorded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellResponse {
    pub message: String,
    pub log_id: u64,
}

/// Request body for creating a purchase order.
///
/// The order form submits numbers or numeric strings interchangeably,
/// so the fields are untyped JSON values parsed on access.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub supplier_id: serde_json::Value,
    #[serde(default)]
    pub quantity: serde_json::Value,
    #[serde(default)]
    pub total: serde_json::Value,
}

impl CreateOrderRequest {
    pub fn parse_supplier_id(&self) -> Result<u64, ApiError> {
        parse_u64(&self.supplier_id, "supplierId")
    }

    pub fn parse_quantity(&self) -> Result<u32, ApiError> {
        let quantity = parse_u64(&self.quantity, "quantity")?;
        u32::try_from(quantity)
            .map_err(|_| ApiError::invalid_input("quantity is out of range".to_string()))
    }

    pub fn parse_total(&self) -> Result<f64, ApiError> {
        parse_f64(&self.total, "total")
    }
}

fn parse_u64(value: &serde_json::Value, field: &str) -> Result<u64, ApiError> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ApiError::invalid_input(format!("{} must be a whole number", field))),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ApiError::invalid_input(format!("{} is not a valid number: {}", field, s))),
        _ => Err(ApiError::invalid_input(format!("{} is required", field))),
    }
}

fn parse_f64(value: &serde_json::Value, field: &str) -> Result<f64, ApiError> {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ApiError::invalid_input(format!("{} must be a number", field))),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ApiError::invalid_input(format!("{} is not a valid number: {}", field, s))),
        _ => Err(ApiError::invalid_input(format!("{} is required", field))),
    }
}

/// Purchase order response row
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: u64,
    pub supplier_id: u64,
    pub items: u32,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.0,
            supplier_id: order.supplier_id.0,
            items: order.items,
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Incoming shipment response row
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub id: u64,
    pub product_id: u64,
    pub from_holder: Option<u64>,
    pub action: TransferAction,
    pub timestamp: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl From<TransferLogEntry> for ShipmentResponse {
    fn from(entry: TransferLogEntry) -> Self {
        Self {
            id: entry.id.0,
            product_id: entry.product_id.0,
            from_holder: entry.from_holder.map(|u| u.0),
            action: entry.action,
            timestamp: entry.timestamp,
            location: entry.location,
            notes: entry.notes,
        }
    }
}

/// Product summary in a provenance response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: Uuid,
    pub crop_name: String,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub harvest_date: NaiveDate,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.public_id,
            crop_name: product.crop_name,
            price: product.price,
            quantity: product.quantity,
            harvest_date: product.harvest_date,
        }
    }
}

/// One step of a provenance chain
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceStep {
    pub action: TransferAction,
    pub from_holder: Option<u64>,
    pub to_holder: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub confirmed: bool,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl From<TransferLogEntry> for ProvenanceStep {
    fn from(entry: TransferLogEntry) -> Self {
        Self {
            action: entry.action,
            from_holder: entry.from_holder.map(|u| u.0),
            to_holder: entry.to_holder.map(|u| u.0),
            timestamp: entry.timestamp,
            confirmed: entry.confirmed,
            location: entry.location,
            notes: entry.notes,
        }
    }
}

/// Full provenance response: the product plus its custody chain,
/// oldest entry first
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceResponse {
    pub product: ProductSummary,
    pub chain: Vec<ProvenanceStep>,
}

impl From<Provenance> for ProvenanceResponse {
    fn from(provenance: Provenance) -> Self {
        Self {
            product: provenance.product.into(),
            chain: provenance.chain.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_request_accepts_numbers_and_strings() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "supplierId": 7,
            "quantity": "12",
            "total": "349.5"
        }))
        .unwrap();

        assert_eq!(req.parse_supplier_id().unwrap(), 7);
        assert_eq!(req.parse_quantity().unwrap(), 12);
        assert_eq!(req.parse_total().unwrap(), 349.5);
    }

    #[test]
    fn test_order_request_rejects_garbage() {
        let req: CreateOrderRequest = serde_json::from_value(json!({
            "supplierId": "seven",
            "quantity": 2,
            "total": 10.0
        }))
        .unwrap();
        assert!(req.parse_supplier_id().is_err());

        let req: CreateOrderRequest = serde_json::from_value(json!({
            "quantity": 2,
            "total": 10.0
        }))
        .unwrap();
        assert!(req.parse_supplier_id().is_err());
    }

    #[test]
    fn test_sell_request_field_name() {
        let req: SellRequest = serde_json::from_value(json!({
            "productId": "7f2c9a44-9114-4c21-a91a-0b05cd66aa12"
        }))
        .unwrap();
        assert_eq!(
            req.product_id.to_string(),
            "7f2c9a44-9114-4c21-a91a-0b05cd66aa12"
        );
    }
}
