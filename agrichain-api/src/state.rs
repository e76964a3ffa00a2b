//! Application State
//!
//! Shared state for the API service: one storage backend behind the
//! store traits, the JWT config, and the statistics constants. The
//! aggregators are cheap to build, so handlers construct them per
//! request from the shared store handle.

use std::sync::Arc;

use agrichain_core::storage::Store;
use agrichain_core::{
    AdminOverviewAggregator, FarmerStatsAggregator, OwnershipResolver, ProvenanceAssembler,
    RetailerStatsAggregator, StatsConfig,
};

use crate::middleware::AuthState;

/// Application state
pub struct AppState<S> {
    /// Storage backend
    pub store: Arc<S>,
    /// Statistics constants
    pub stats: StatsConfig,
    /// JWT configuration
    pub auth: AuthState,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            stats: self.stats.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<S: Store> AppState<S> {
    /// Create new application state
    pub fn new(store: Arc<S>, stats: StatsConfig, auth: AuthState) -> Self {
        Self { store, stats, auth }
    }

    pub fn resolver(&self) -> OwnershipResolver<S> {
        OwnershipResolver::new(self.store.clone())
    }

    pub fn provenance(&self) -> ProvenanceAssembler<S, S> {
        ProvenanceAssembler::new(self.store.clone(), self.store.clone())
    }

    pub fn farmer_stats(&self) -> FarmerStatsAggregator<S, S> {
        FarmerStatsAggregator::new(self.store.clone(), self.store.clone())
    }

    pub fn retailer_stats(&self) -> RetailerStatsAggregator<S, S, S> {
        RetailerStatsAggregator::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.stats.clone(),
        )
    }

    pub fn admin_overview(&self) -> AdminOverviewAggregator<S, S, S> {
        AdminOverviewAggregator::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.stats.clone(),
        )
    }
}
