//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Rejections from the bearer-token extractor. All map to 401; the message
/// distinguishes a missing token, an expired one, a bad signature, and a
/// payload without a usable subject.
#[derive(Debug)]
pub enum AuthError {
    NoToken,
    TokenExpired,
    TokenInvalid,
    InvalidPayload,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::NoToken => "Not authorized, no token",
            AuthError::TokenExpired => "Token expired. Please log in again.",
            AuthError::TokenInvalid => "Invalid token. Please log in again.",
            AuthError::InvalidPayload => "Invalid token payload",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
