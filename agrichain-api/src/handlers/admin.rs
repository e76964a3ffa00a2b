//! Admin Handlers

use axum::{extract::State, Json};

use agrichain_core::stats::AdminOverview;
use agrichain_core::storage::Store;

use crate::error::ApiResult;
use crate::state::AppState;

/// Platform-wide overview figures
pub async fn admin_overview<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<AdminOverview>> {
    let overview = state.admin_overview().overview().await?;
    Ok(Json(overview))
}
