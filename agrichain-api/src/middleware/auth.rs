//! JWT Authentication Middleware
//!
//! Validates bearer tokens and stores the claims in request extensions
//! for downstream handlers. The subject is the user's email; handlers
//! resolve it to a stored user record.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ErrorResponse;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256
    pub secret: String,
    /// Algorithm to use
    pub algorithm: Algorithm,
    /// Whether to validate expiration
    pub validate_exp: bool,
}

/// Error type for JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfigError {
    pub message: String,
}

impl std::fmt::Display for JwtConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JWT config error: {}", self.message)
    }
}

impl std::error::Error for JwtConfigError {}

impl JwtConfig {
    /// Minimum secret length
    const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new JWT config with secret.
    ///
    /// Fails if the secret is shorter than 32 bytes.
    pub fn try_new(secret: impl Into<String>) -> Result<Self, JwtConfigError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtConfigError {
                message: format!(
                    "JWT secret must be at least {} bytes. Got {} bytes. \
                    Use a cryptographically secure random secret.",
                    Self::MIN_SECRET_LENGTH,
                    secret.len()
                ),
            });
        }
        Ok(Self {
            secret,
            algorithm: Algorithm::HS256,
            validate_exp: true,
        })
    }

    /// Create a new JWT config from an environment variable.
    ///
    /// Fails if the variable is not set or the secret is too short.
    pub fn try_from_env(env_var: &str) -> Result<Self, JwtConfigError> {
        let secret = std::env::var(env_var).map_err(|_| JwtConfigError {
            message: format!(
                "JWT secret environment variable '{}' is not set. \
                Set it to a cryptographically secure random value (at least 32 bytes).",
                env_var
            ),
        })?;
        Self::try_new(secret)
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject (user email)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Role name (farmer | retailer | admin)
    #[serde(default)]
    pub role: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

impl AuthClaims {
    /// Check if the token carries a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingToken,
    /// Invalid token format
    InvalidTokenFormat,
    /// Token validation failed
    ValidationFailed(String),
    /// Token expired
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AuthError::MissingToken => (
                "MISSING_TOKEN",
                "Authorization header is required".to_string(),
            ),
            AuthError::InvalidTokenFormat => (
                "INVALID_TOKEN_FORMAT",
                "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            ),
            AuthError::ValidationFailed(msg) => ("TOKEN_VALIDATION_FAILED", msg),
            AuthError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired".to_string()),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Extract the bearer token from an authorization header value
pub fn extract_token(auth_header: &str) -> Result<&str, AuthError> {
    if !auth_header.starts_with("Bearer ") {
        return Err(AuthError::InvalidTokenFormat);
    }
    Ok(&auth_header[7..])
}

/// Validate a JWT and extract its claims
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<AuthClaims, AuthError> {
    let mut validation = Validation::new(config.algorithm);
    validation.validate_exp = config.validate_exp;

    let key = DecodingKey::from_secret(config.secret.as_bytes());

    let token_data = decode::<AuthClaims>(token, &key, &validation).map_err(|e| {
        if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
            AuthError::TokenExpired
        } else {
            AuthError::ValidationFailed(e.to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Authentication state for sharing config
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<JwtConfig>,
}

impl AuthState {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Require authentication middleware
///
/// Validates the JWT token and stores claims in request extensions.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_token(auth_header)?;
    let claims = validate_token(token, &auth_state.config)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &str = "unit-test-secret-0123456789-0123456789";

    fn create_test_token(claims: &AuthClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_extract_token() {
        assert!(extract_token("Bearer abc123").is_ok());
        assert!(extract_token("Basic abc123").is_err());
        assert!(extract_token("abc123").is_err());
    }

    #[test]
    fn test_secret_length_enforced() {
        assert!(JwtConfig::try_new("short").is_err());
        assert!(JwtConfig::try_new(TEST_SECRET).is_ok());
    }

    #[test]
    fn test_validate_token() {
        let config = JwtConfig::try_new(TEST_SECRET).unwrap();

        let claims = AuthClaims {
            sub: "farmer@example.com".to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as u64,
            iat: chrono::Utc::now().timestamp() as u64,
            role: "farmer".to_string(),
            name: Some("Asha".to_string()),
        };

        let token = create_test_token(&claims, TEST_SECRET);
        let validated = validate_token(&token, &config).unwrap();

        assert_eq!(validated.sub, "farmer@example.com");
        assert!(validated.has_role("farmer"));
        assert!(validated.has_role("FARMER"));
        assert!(!validated.has_role("admin"));
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::try_new(TEST_SECRET).unwrap();

        let claims = AuthClaims {
            sub: "farmer@example.com".to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as u64,
            iat: chrono::Utc::now().timestamp() as u64,
            role: "farmer".to_string(),
            name: None,
        };

        let token = create_test_token(&claims, TEST_SECRET);
        let result = validate_token(&token, &config);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = JwtConfig::try_new(TEST_SECRET).unwrap();
        let claims = AuthClaims {
            sub: "farmer@example.com".to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as u64,
            iat: chrono::Utc::now().timestamp() as u64,
            role: "farmer".to_string(),
            name: None,
        };

        let token = create_test_token(&claims, "another-secret-0123456789-0123456789");
        assert!(matches!(
            validate_token(&token, &config),
            Err(AuthError::ValidationFailed(_))
        ));
    }
}
