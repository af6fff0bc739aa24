mod auth;
mod error;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::rate_limit::RateLimitConfig;

pub use auth::AuthState;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, secure_cookies: bool) -> Router {
    let rate_limits = Arc::new(RateLimitConfig::new());

    let auth_state = auth::AuthState {
        db,
        jwt,
        secure_cookies,
    };

    Router::new().nest("/auth", auth::router(auth_state, rate_limits))
}
