//! Retailer Handlers
//!
//! Dashboard, inventory, orders, sales chart, shipments, provenance,
//! and the two write operations (sell, order creation).

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use agrichain_core::stats::{InventoryItem, RetailerDashboard, SalesChart};
use agrichain_core::storage::{NewOrder, NewTransferLogEntry, Store};
use agrichain_core::types::{TransferAction, UserId, ORDER_STATUS_PROCESSING};

use super::current_user;
use crate::dto::{
    CreateOrderRequest, OrderResponse, ProvenanceResponse, SellRequest, SellResponse,
    ShipmentResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthClaims;
use crate::state::AppState;

/// Orders shown on the dashboard's recent list
const RECENT_ORDER_LIMIT: usize = 5;

/// Retailer dashboard counters
pub async fn dashboard_stats<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<RetailerDashboard>> {
    let retailer = current_user(&state, &claims).await?;
    let dashboard = state.retailer_stats().dashboard(retailer.id).await?;
    Ok(Json(dashboard))
}

/// Five most recent purchase orders
pub async fn recent_orders<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let retailer = current_user(&state, &claims).await?;
    let orders = state
        .store
        .find_by_retailer(retailer.id, Some(RECENT_ORDER_LIMIT))
        .await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// All purchase orders, newest first
pub async fn all_orders<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let retailer = current_user(&state, &claims).await?;
    let orders = state.store.find_by_retailer(retailer.id, None).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Sales chart for the trailing week
pub async fn sales_chart<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<SalesChart>> {
    let retailer = current_user(&state, &claims).await?;
    let chart = state
        .retailer_stats()
        .sales_chart(retailer.id, Utc::now().date_naive())
        .await?;
    Ok(Json(chart))
}

/// Inventory rows for currently held products
pub async fn inventory<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let retailer = current_user(&state, &claims).await?;
    let items = state.retailer_stats().inventory(retailer.id).await?;
    Ok(Json(items))
}

/// Pending inbound shipments
pub async fn shipments<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<Vec<ShipmentResponse>>> {
    let retailer = current_user(&state, &claims).await?;
    let pending = state.resolver().incoming_shipments(retailer.id).await?;
    Ok(Json(pending.into_iter().map(Into::into).collect()))
}

/// Provenance chain for a product by its public id.
///
/// Available to any authenticated user, not only retailers.
pub async fn provenance<S: Store>(
    State(state): State<AppState<S>>,
    Path(public_id): Path<Uuid>,
) -> ApiResult<Json<ProvenanceResponse>> {
    let provenance = state.provenance().assemble(public_id).await?;
    Ok(Json(provenance.into()))
}

/// Record a consumer sale of a held product.
///
/// Appends a confirmed SOLD entry with no destination holder; the
/// product leaves the tracked chain.
pub async fn sell<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<SellRequest>,
) -> ApiResult<Json<SellResponse>> {
    let retailer = current_user(&state, &claims).await?;

    let product = state
        .store
        .find_by_public_id(request.product_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Product not found: {}", request.product_id))
        })?;

    let entry = state
        .store
        .append(NewTransferLogEntry {
            product_id: product.id,
            from_holder: Some(retailer.id),
            to_holder: None,
            action: TransferAction::Sold,
            timestamp: Utc::now(),
            confirmed: true,
            location: Some("Retail Store".to_string()),
            notes: Some("Sold to consumer".to_string()),
            created_by: Some(retailer.name.clone()),
        })
        .await?;

    info!(
        retailer = %retailer.id,
        product = %product.id,
        log = %entry.id,
        "Recorded consumer sale"
    );

    Ok(Json(SellResponse {
        message: "Sale recorded".to_string(),
        log_id: entry.id.0,
    }))
}

/// Create a purchase order with status Processing
pub async fn create_order<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let retailer = current_user(&state, &claims).await?;

    let supplier_id = request.parse_supplier_id()?;
    let items = request.parse_quantity()?;
    let total_amount = request.parse_total()?;

    let order = state
        .store
        .create_order(NewOrder {
            retailer_id: retailer.id,
            supplier_id: UserId(supplier_id),
            items,
            total_amount,
            status: ORDER_STATUS_PROCESSING.to_string(),
            created_at: Utc::now(),
        })
        .await?;

    info!(
        retailer = %retailer.id,
        order = %order.id,
        supplier = supplier_id,
        "Created purchase order"
    );

    Ok(Json(order.into()))
}
