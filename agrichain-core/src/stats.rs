//! Dashboard statistics
//!
//! Aggregators for the farmer, retailer, and admin dashboards. Each one
//! folds over a collection scoped to one actor and sums guarded values;
//! missing or non-positive price/quantity contributes zero, never an
//! error.
//!
//! Several figures are deliberately flat placeholders carried over from
//! the product requirements (per-sale chart value, inventory unit
//! value, the whole admin overview). They live in [`StatsConfig`] so an
//! operator can tune them; they are not derived from real data.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::error::CoreResult;
use crate::ownership::OwnershipResolver;
use crate::storage::{OrderStore, ProductStore, TransferLogStore, UserStore};
use crate::types::{Product, TransferLogEntry, User, UserId, ORDER_STATUS_DELIVERED};

/// Days covered by the sales chart, today included
pub const SALES_CHART_DAYS: usize = 7;

/// Tunable constants for the aggregators
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Flat value per held item when computing inventory value
    pub inventory_unit_value: f64,
    /// Flat value per outbound sale event in the sales chart
    pub sale_event_value: f64,
    /// Markup applied to cost price for the suggested sell price
    pub resale_markup: f64,
    /// Placeholder on-hand quantity for inventory rows
    pub quantity_on_hand: f64,
    /// Days after harvest before an inventory row is considered expired
    pub shelf_life_days: i64,
    /// Order status treated as terminal when counting open POs
    pub terminal_order_status: String,
    /// Placeholder average rating for the admin overview
    pub admin_average_rating: f64,
    /// Placeholder average sale price for the admin sales volume figure
    pub admin_average_price: f64,
    /// Placeholder pending-order count for the admin overview
    pub admin_pending_orders: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            inventory_unit_value: 500.0,
            sale_event_value: 100.0,
            resale_markup: 1.5,
            quantity_on_hand: 100.0,
            shelf_life_days: 10,
            terminal_order_status: ORDER_STATUS_DELIVERED.to_string(),
            admin_average_rating: 4.5,
            admin_average_price: 1500.0,
            admin_pending_orders: 12,
        }
    }
}

/// Farmer dashboard figures
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerStats {
    pub total_products: u64,
    pub sold_products: u64,
    pub active_products: u64,
    pub total_revenue: f64,
    pub estimated_value: f64,
    pub farmer_name: String,
}

/// Retailer dashboard figures
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerDashboard {
    pub inventory_value: f64,
    #[serde(rename = "openPOs")]
    pub open_pos: u64,
    pub incoming_shipments: u64,
    pub low_stock: u64,
}

/// One row of the retailer inventory view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_id: uuid::Uuid,
    pub name: String,
    pub batch_id: String,
    pub qty_on_hand: f64,
    pub unit: String,
    pub cost_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub expiry_date: NaiveDate,
    pub supplier: Option<String>,
    pub status: String,
}

/// Sales-over-time chart: always exactly [`SALES_CHART_DAYS`] buckets,
/// oldest first
#[derive(Debug, Clone, Serialize)]
pub struct SalesChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Admin overview figures (mock analytics by design)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub total_users: u64,
    pub total_products: u64,
    pub total_transfers: u64,
    pub sales_volume: f64,
    pub pending_orders: u64,
    pub new_users_today: u64,
    pub average_rating: f64,
}

/// Farmer statistics: partition the farmer's products into sold vs
/// active and sum guarded `price x quantity` into revenue vs estimated
/// value.
///
/// "Sold" means any transfer-log entry exists for the product. This is
/// the predicate the product requirements name, and it is kept verbatim
/// even though a product whose only entry is its creation event counts
/// as sold under it.
pub struct FarmerStatsAggregator<P, L>
where
    P: ProductStore,
    L: TransferLogStore,
{
    products: Arc<P>,
    log: Arc<L>,
}

impl<P, L> FarmerStatsAggregator<P, L>
where
    P: ProductStore,
    L: TransferLogStore,
{
    pub fn new(products: Arc<P>, log: Arc<L>) -> Self {
        Self { products, log }
    }

    pub async fn stats(&self, farmer: &User) -> CoreResult<FarmerStats> {
        let products = self.products.find_by_farmer(farmer.id).await?;

        let mut sold_products = 0u64;
        let mut active_products = 0u64;
        let mut total_revenue = 0.0;
        let mut estimated_value = 0.0;

        for product in &products {
            let is_sold = self.log.has_any_for_product(product.id).await?;
            if is_sold {
                sold_products += 1;
                total_revenue += product.gross_value();
            } else {
                active_products += 1;
                estimated_value += product.gross_value();
            }
        }

        info!(
            farmer = %farmer.id,
            total = products.len(),
            sold = sold_products,
            active = active_products,
            revenue = total_revenue,
            "Computed farmer stats"
        );

        Ok(FarmerStats {
            total_products: products.len() as u64,
            sold_products,
            active_products,
            total_revenue,
            estimated_value,
            farmer_name: farmer.name.clone(),
        })
    }
}

/// Retailer aggregations: dashboard counters, inventory rows, and the
/// 7-day sales chart. Inventory questions go through the ownership
/// resolver; order questions go straight to the order store.
pub struct RetailerStatsAggregator<P, L, O>
where
    P: ProductStore,
    L: TransferLogStore,
    O: OrderStore,
{
    products: Arc<P>,
    log: Arc<L>,
    orders: Arc<O>,
    resolver: OwnershipResolver<L>,
    config: StatsConfig,
}

impl<P, L, O> RetailerStatsAggregator<P, L, O>
where
    P: ProductStore,
    L: TransferLogStore,
    O: OrderStore,
{
    pub fn new(products: Arc<P>, log: Arc<L>, orders: Arc<O>, config: StatsConfig) -> Self {
        let resolver = OwnershipResolver::new(log.clone());
        Self {
            products,
            log,
            orders,
            resolver,
            config,
        }
    }

    pub async fn dashboard(&self, retailer: UserId) -> CoreResult<RetailerDashboard> {
        let held = self.resolver.held_products(retailer).await?;
        let inventory_value = held.len() as f64 * self.config.inventory_unit_value;

        let open_pos = self
            .orders
            .count_open_for_retailer(retailer, &self.config.terminal_order_status)
            .await?;

        let incoming = self.resolver.incoming_shipments(retailer).await?.len() as u64;

        info!(
            retailer = %retailer,
            held = held.len(),
            open_pos,
            incoming,
            "Computed retailer dashboard"
        );

        Ok(RetailerDashboard {
            inventory_value,
            open_pos,
            incoming_shipments: incoming,
            // No stock thresholds tracked yet; constant default.
            low_stock: 0,
        })
    }

    /// Inventory rows for every currently held product. Held products
    /// whose product record is missing are skipped.
    pub async fn inventory(&self, retailer: UserId) -> CoreResult<Vec<InventoryItem>> {
        let receipts = self.resolver.held_receipts(retailer).await?;

        let mut items = Vec::with_capacity(receipts.len());
        for receipt in receipts {
            let Some(product) = self.products.get_product(receipt.product_id).await? else {
                continue;
            };
            items.push(self.inventory_row(&product, &receipt));
        }
        Ok(items)
    }

    fn inventory_row(&self, product: &Product, receipt: &TransferLogEntry) -> InventoryItem {
        InventoryItem {
            product_id: product.public_id,
            name: product.crop_name.clone(),
            batch_id: format!("BATCH-{}", product.id.0),
            qty_on_hand: self.config.quantity_on_hand,
            unit: "kg".to_string(),
            cost_price: product.price,
            sell_price: product.price.map(|p| p * self.config.resale_markup),
            expiry_date: product.harvest_date + Duration::days(self.config.shelf_life_days),
            supplier: receipt.created_by.clone(),
            status: "In Stock".to_string(),
        }
    }

    /// Confirmed outbound entries bucketed per calendar day over the
    /// trailing window ending at `today`. Every day is present even
    /// with no activity; each entry contributes the flat per-sale
    /// value.
    pub async fn sales_chart(&self, retailer: UserId, today: NaiveDate) -> CoreResult<SalesChart> {
        let entries = self.log.find_by_from_holder(retailer).await?;
        Ok(build_sales_chart(&entries, retailer, today, &self.config))
    }
}

/// Pure sales-chart fold, separated from the store for tests
pub fn build_sales_chart(
    entries: &[TransferLogEntry],
    retailer: UserId,
    today: NaiveDate,
    config: &StatsConfig,
) -> SalesChart {
    let window_start = today - Duration::days(SALES_CHART_DAYS as i64 - 1);

    let mut values = vec![0.0; SALES_CHART_DAYS];
    for entry in entries {
        if !entry.is_confirmed_outbound(retailer) {
            continue;
        }
        let day = entry.timestamp.date_naive();
        if day < window_start || day > today {
            continue;
        }
        let bucket = (day - window_start).num_days() as usize;
        values[bucket] += config.sale_event_value;
    }

    let labels = (0..SALES_CHART_DAYS)
        .map(|i| (window_start + Duration::days(i as i64)).format("%b %d").to_string())
        .collect();

    SalesChart { labels, values }
}

/// Admin overview: store counts plus the placeholder analytics figures.
pub struct AdminOverviewAggregator<U, P, L>
where
    U: UserStore,
    P: ProductStore,
    L: TransferLogStore,
{
    users: Arc<U>,
    products: Arc<P>,
    log: Arc<L>,
    config: StatsConfig,
}

impl<U, P, L> AdminOverviewAggregator<U, P, L>
where
    U: UserStore,
    P: ProductStore,
    L: TransferLogStore,
{
    pub fn new(users: Arc<U>, products: Arc<P>, log: Arc<L>, config: StatsConfig) -> Self {
        Self {
            users,
            products,
            log,
            config,
        }
    }

    pub async fn overview(&self) -> CoreResult<AdminOverview> {
        let total_users = self.users.count_users().await?;
        let total_products = self.products.count_products().await?;
        let total_transfers = self.log.count_entries().await?;

        Ok(AdminOverview {
            total_users,
            total_products,
            total_transfers,
            sales_volume: total_products as f64 * self.config.admin_average_price,
            pending_orders: self.config.admin_pending_orders,
            new_users_today: total_users / 15 + 1,
            average_rating: self.config.admin_average_rating,
        })
    }
}
