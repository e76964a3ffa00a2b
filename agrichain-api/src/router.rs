//! API Router
//!
//! Route definitions and middleware layering. Authentication wraps
//! every non-health route; the role guards wrap their route groups and
//! run after the auth layer has stored the claims.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use agrichain_core::storage::Store;
use agrichain_core::types::Role;

use crate::middleware::{require_auth, require_role};
use crate::{handlers, state::AppState};

/// Create the API router
pub fn create_router<S: Store>(state: AppState<S>) -> Router {
    let auth_state = state.auth.clone();

    let farmer = Router::new()
        .route("/farmer/stats", get(handlers::farmer_stats::<S>))
        .route_layer(from_fn(require_role(Role::Farmer)));

    let retailer = Router::new()
        .route(
            "/retailer/dashboard-stats",
            get(handlers::dashboard_stats::<S>),
        )
        .route("/retailer/orders", get(handlers::recent_orders::<S>))
        .route("/retailer/orders/all", get(handlers::all_orders::<S>))
        .route("/retailer/sales-chart", get(handlers::sales_chart::<S>))
        .route("/retailer/inventory", get(handlers::inventory::<S>))
        .route("/retailer/shipments", get(handlers::shipments::<S>))
        .route("/retailer/sell", post(handlers::sell::<S>))
        .route("/retailer/orders/create", post(handlers::create_order::<S>))
        .route_layer(from_fn(require_role(Role::Retailer)));

    let admin = Router::new()
        .route("/admin/overview", get(handlers::admin_overview::<S>))
        .route_layer(from_fn(require_role(Role::Admin)));

    // Provenance is readable by any authenticated user
    let provenance = Router::new().route(
        "/retailer/provenance/:public_id",
        get(handlers::provenance::<S>),
    );

    let protected = farmer
        .merge(retailer)
        .merge(admin)
        .merge(provenance)
        .route_layer(from_fn_with_state(auth_state, require_auth));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(protected)
        .with_state(state)
}
