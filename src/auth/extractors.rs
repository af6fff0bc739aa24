//! Axum extractor for bearer-token authentication.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use super::errors::AuthError;
use super::state::HasAuthState;
use super::types::AuthenticatedUser;
use crate::jwt::JwtError;

/// Extractor for endpoints that require a valid access token.
///
/// Reads the `Authorization: Bearer <token>` header, verifies signature and
/// expiry, and publishes the identity claims to the handler. Handlers for
/// user-scoped data take `Auth(user)` and filter on `user.id`.
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::NoToken)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::NoToken)?;

        let claims = state.jwt().validate_access_token(token).map_err(|e| match e {
            JwtError::Expired => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?;

        // The subject is a stringified user ID; anything else is a token we
        // did not mint.
        let id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidPayload)?;

        Ok(Auth(AuthenticatedUser {
            id,
            email: claims.email,
        }))
    }
}
