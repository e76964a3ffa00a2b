//! Role Guard Middleware
//!
//! Enforces the per-route-group role requirement. The auth middleware
//! runs first and stores claims in request extensions; this guard
//! compares the token's role claim against the role the route group
//! demands.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use agrichain_core::types::Role;

use super::auth::AuthClaims;
use crate::error::ErrorResponse;

/// Role guard error
#[derive(Debug)]
pub enum RbacError {
    /// No authentication found
    Unauthenticated,
    /// Token role does not grant access
    Forbidden(Role),
}

impl IntoResponse for RbacError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            RbacError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required".to_string(),
            ),
            RbacError::Forbidden(role) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                format!("Requires role: {}", role.as_str()),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Require role middleware factory
pub fn require_role(
    role: Role,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, RbacError>> + Send>>
       + Clone
       + Send
       + 'static {
    move |request: Request, next: Next| {
        Box::pin(async move {
            // Claims were set by the auth middleware
            let claims = request
                .extensions()
                .get::<AuthClaims>()
                .ok_or(RbacError::Unauthenticated)?;

            match Role::parse(&claims.role) {
                Some(claimed) if claimed == role => Ok(next.run(request).await),
                _ => Err(RbacError::Forbidden(role)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_names_required_role() {
        let response = RbacError::Forbidden(Role::Retailer).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthenticated_is_401() {
        let response = RbacError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
