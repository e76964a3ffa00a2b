//! AgriChain REST API Layer
//!
//! HTTP REST API for the farm-to-retail tracking service.
//!
//! # Endpoints
//!
//! ## Health
//! - `GET /health` - Health check
//!
//! ## Farmer
//! - `GET /farmer/stats` - Farmer dashboard statistics
//!
//! ## Retailer
//! - `GET /retailer/dashboard-stats` - Dashboard counters
//! - `GET /retailer/orders` - Five most recent purchase orders
//! - `GET /retailer/orders/all` - All purchase orders
//! - `GET /retailer/sales-chart` - Trailing-week sales chart
//! - `GET /retailer/inventory` - Inventory rows for held products
//! - `GET /retailer/shipments` - Pending inbound shipments
//! - `GET /retailer/provenance/:public_id` - Provenance chain (any authenticated user)
//! - `POST /retailer/sell` - Record a consumer sale
//! - `POST /retailer/orders/create` - Create a purchase order
//!
//! ## Admin
//! - `GET /admin/overview` - Platform-wide overview
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use agrichain_api::{create_router, AppState, JwtConfig, AuthState};
//! use agrichain_core::{MemoryStore, StatsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthState::new(JwtConfig::try_from_env("AGRICHAIN_JWT_SECRET")?);
//!     let state = AppState::new(Arc::new(MemoryStore::new()), StatsConfig::default(), auth);
//!     let app = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use middleware::{require_auth, require_role, AuthClaims, AuthState, JwtConfig};
pub use router::create_router;
pub use state::AppState;

use agrichain_core::StatsConfig;

/// API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable holding the JWT signing secret
pub const JWT_SECRET_ENV: &str = "AGRICHAIN_JWT_SECRET";

/// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub bind_addr: String,
    /// Port
    pub port: u16,
    /// Sled storage path; `None` runs on the in-memory backend
    pub storage_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            storage_path: None,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("AGRICHAIN_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("AGRICHAIN_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            storage_path: std::env::var("AGRICHAIN_STORAGE_PATH").ok(),
        }
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Statistics constants with environment overrides applied
pub fn stats_config_from_env() -> StatsConfig {
    fn var<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    let defaults = StatsConfig::default();
    StatsConfig {
        inventory_unit_value: var(
            "AGRICHAIN_INVENTORY_UNIT_VALUE",
            defaults.inventory_unit_value,
        ),
        sale_event_value: var("AGRICHAIN_SALE_EVENT_VALUE", defaults.sale_event_value),
        resale_markup: var("AGRICHAIN_RESALE_MARKUP", defaults.resale_markup),
        quantity_on_hand: var("AGRICHAIN_QTY_ON_HAND", defaults.quantity_on_hand),
        shelf_life_days: var("AGRICHAIN_SHELF_LIFE_DAYS", defaults.shelf_life_days),
        terminal_order_status: std::env::var("AGRICHAIN_TERMINAL_ORDER_STATUS")
            .unwrap_or(defaults.terminal_order_status),
        admin_average_rating: var("AGRICHAIN_ADMIN_AVG_RATING", defaults.admin_average_rating),
        admin_average_price: var("AGRICHAIN_ADMIN_AVG_PRICE", defaults.admin_average_price),
        admin_pending_orders: var(
            "AGRICHAIN_ADMIN_PENDING_ORDERS",
            defaults.admin_pending_orders,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.storage_path.is_none());
    }
}
