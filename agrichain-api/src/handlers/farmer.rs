//! Farmer Handlers

use axum::{extract::State, Extension, Json};

use agrichain_core::stats::FarmerStats;
use agrichain_core::storage::Store;

use super::current_user;
use crate::error::ApiResult;
use crate::middleware::AuthClaims;
use crate::state::AppState;

/// Farmer dashboard statistics
pub async fn farmer_stats<S: Store>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<FarmerStats>> {
    let farmer = current_user(&state, &claims).await?;
    let stats = state.farmer_stats().stats(&farmer).await?;
    Ok(Json(stats))
}
