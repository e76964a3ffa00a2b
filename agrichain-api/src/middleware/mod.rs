//! API Middleware
//!
//! Authentication and role enforcement for the route groups.

pub mod auth;
pub mod rbac;

pub use auth::{require_auth, AuthClaims, AuthState, JwtConfig, JwtConfigError};
pub use rbac::{require_role, RbacError};
