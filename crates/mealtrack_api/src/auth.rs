//! Bearer-token verification for the user-facing endpoints.
//!
//! Tokens are HS256 JWTs minted by the account service; the user id rides
//! in the standard `sub` claim.

use jwt_simple::prelude::*;

use crate::error::ApiError;

/// Verifies request tokens against the shared signing secret.
#[derive(Clone)]
pub struct AuthVerifier {
    key: HS256Key,
}

impl AuthVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
        }
    }

    /// Extract the user id from an `Authorization: Bearer <jwt>` header
    /// value. Rejects missing headers, bad signatures, expired tokens and
    /// tokens without a subject.
    pub fn user_id_from_header(&self, header: Option<&str>) -> Result<String, ApiError> {
        let header =
            header.ok_or_else(|| ApiError::Auth("missing Authorization header".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Auth("expected a Bearer token".to_string()))?;
        let claims = self
            .key
            .verify_token::<NoCustomClaims>(token, None)
            .map_err(|e| ApiError::Auth(format!("token rejected: {e}")))?;
        claims
            .subject
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| ApiError::Auth("token has no subject".to_string()))
    }
}
