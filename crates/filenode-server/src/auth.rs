//! Bearer-token authentication.
//!
//! The coordinator identifies callers by an opaque identity byte string,
//! passed to `QuotaClient::check_limit`. Here that identity is a JWT
//! subject claim.

use crate::error::ApiError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the caller's identity.
    pub sub: String,
    pub exp: i64,
    pub iat: Option<i64>,
}

/// The authenticated caller of a request, threaded through as an axum
/// extension by [`crate::middleware::auth_middleware`].
#[derive(Clone, Debug)]
pub struct Identity(pub String);

impl Identity {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("token validation failed: {e}");
            ApiError::Forbidden("invalid or expired token".to_string())
        })
}

pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}
