//! Session API endpoints.
//!
//! - POST `/register` - Create an account, issue access + refresh tokens
//! - POST `/login` - Verify credentials, issue access + refresh tokens
//! - POST `/refresh` - Exchange the refresh cookie for a new access token
//! - POST `/logout` - Clear the refresh cookie
//! - GET `/me` - Identity of the bearer (exercises the token verifier)

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::error::{ApiError, ResultExt};
use crate::auth::{Auth, HasAuthState, REFRESH_COOKIE_NAME, clear_refresh_cookie, get_cookie, refresh_cookie};
use crate::db::{Database, UserStoreError};
use crate::jwt::JwtConfig;
use crate::password;
use crate::rate_limit::{RateLimitConfig, rate_limit_login, rate_limit_register};

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub secure_cookies: bool,
}

impl HasAuthState for AuthState {
    fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }
}

pub fn router(state: AuthState, rate_limits: Arc<RateLimitConfig>) -> Router {
    let register_routes = Router::new()
        .route("/register", post(register))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            rate_limits.clone(),
            rate_limit_register,
        ));

    let login_routes = Router::new()
        .route("/login", post(login))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(rate_limits, rate_limit_login));

    let session_routes = Router::new()
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(state);

    Router::new()
        .merge(register_routes)
        .merge(login_routes)
        .merge(session_routes)
}

/// Fields default to empty so an absent field and an empty one get the
/// same 400 from the handler's own validation, not a generic body-parse
/// rejection.
#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct RegisterResponse {
    id: i64,
    username: String,
    email: String,
    token: String,
}

/// Register a new account and log it in.
///
/// The email pre-check gives the friendly error on the common path; the
/// storage-layer uniqueness constraint is the real guarantee, so a
/// concurrent duplicate that slips past the check gets the same response.
async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = payload.username.trim();
    let email = payload.email.trim();

    if username.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request(
            "Username, email, and password are required",
        ));
    }

    let existing = state
        .db
        .users()
        .find_by_email(email)
        .await
        .db_err("Failed to look up user")?;

    if existing.is_some() {
        return Err(ApiError::bad_request("User with this email already exists"));
    }

    let password_hash =
        password::hash(&payload.password).hash_err("Failed to process password")?;

    let id = match state.db.users().create(username, email, &password_hash).await {
        Ok(id) => id,
        Err(UserStoreError::Duplicate) => {
            return Err(ApiError::bad_request("User with this email already exists"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    let token = issue_access(&state.jwt, id, Some(email))?;
    let refresh_token = issue_refresh(&state.jwt, id)?;

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, refresh_cookie(&refresh_token, state.secure_cookies))],
        Json(RegisterResponse {
            id,
            username: username.to_string(),
            email: email.to_string(),
            token,
        }),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    id: i64,
    email: String,
    username: String,
    token: String,
}

/// Log in with email and password.
///
/// An unknown email and a wrong password produce byte-identical responses,
/// so the client cannot tell which half was wrong.
async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim();

    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = state
        .db
        .users()
        .find_by_email(email)
        .await
        .db_err("Failed to look up user")?
        .ok_or_else(|| ApiError::bad_request("Invalid credentials"))?;

    let matches = password::verify(&payload.password, &user.password_hash)
        .hash_err("Failed to verify password")?;

    if !matches {
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    let token = issue_access(&state.jwt, user.id, Some(&user.email))?;
    let refresh_token = issue_refresh(&state.jwt, user.id)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, refresh_cookie(&refresh_token, state.secure_cookies))],
        Json(LoginResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            token,
        }),
    ))
}

#[derive(Serialize)]
struct RefreshResponse {
    token: String,
}

/// Mint a new access token from the refresh cookie.
///
/// The refresh token carries only the subject, so the user row is re-read
/// to restore the email claim; a refreshed access token has the same claim
/// shape as a login-issued one. A subject that no longer exists is
/// indistinguishable from a bad token.
async fn refresh(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = get_cookie(&headers, REFRESH_COOKIE_NAME)
        .ok_or_else(|| ApiError::unauthorized("Refresh token is required"))?;

    let claims = state
        .jwt
        .validate_refresh_token(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user = state
        .db
        .users()
        .find_by_id(user_id)
        .await
        .db_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let token = issue_access(&state.jwt, user.id, Some(&user.email))?;

    Ok((StatusCode::OK, Json(RefreshResponse { token })))
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Log out by clearing the refresh cookie.
///
/// Already-issued access tokens are not tracked server-side and stay
/// usable until their own expiry.
async fn logout(State(state): State<AuthState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, clear_refresh_cookie(state.secure_cookies))],
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

#[derive(Serialize)]
struct MeResponse {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

/// Return the identity attached by the token verifier. Product and sales
/// handlers consume the same extractor to scope their queries.
async fn me(Auth(user): Auth) -> impl IntoResponse {
    Json(MeResponse {
        id: user.id,
        email: user.email,
    })
}

fn issue_access(jwt: &JwtConfig, user_id: i64, email: Option<&str>) -> Result<String, ApiError> {
    jwt.issue_access_token(user_id, email).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        ApiError::internal("Failed to generate token")
    })
}

fn issue_refresh(jwt: &JwtConfig, user_id: i64) -> Result<String, ApiError> {
    jwt.issue_refresh_token(user_id).map_err(|e| {
        error!("Failed to generate refresh token: {}", e);
        ApiError::internal("Failed to generate token")
    })
}
