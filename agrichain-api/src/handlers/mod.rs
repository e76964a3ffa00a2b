//! API Handlers

pub mod admin;
pub mod farmer;
pub mod health;
pub mod retailer;

pub use admin::*;
pub use farmer::*;
pub use health::*;
pub use retailer::*;

use agrichain_core::storage::Store;
use agrichain_core::types::User;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthClaims;
use crate::state::AppState;

/// Resolve the token subject (email) to a stored user.
///
/// A valid token whose subject has no user record is treated as
/// unauthenticated, not as an internal error.
pub(crate) async fn current_user<S: Store>(
    state: &AppState<S>,
    claims: &AuthClaims,
) -> ApiResult<User> {
    state
        .store
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthenticated(format!("Unknown subject: {}", claims.sub)))
}
