#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use shelflife::{ServerConfig, create_app, db::Database, jwt::JwtConfig};
use tower::ServiceExt;

pub const TEST_ACCESS_SECRET: &[u8] = b"test-access-secret-0123456789abcdef";
pub const TEST_REFRESH_SECRET: &[u8] = b"test-refresh-secret-0123456789abcdef";

/// Create a test app and return (app, db, jwt_config).
/// The returned JwtConfig uses the same secrets as the app, so tests can
/// mint and inspect tokens directly.
pub async fn create_test_app() -> (axum::Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        access_secret: TEST_ACCESS_SECRET.to_vec(),
        refresh_secret: TEST_REFRESH_SECRET.to_vec(),
        secure_cookies: false,
        cors_origin: None,
    };
    let jwt = JwtConfig::new(TEST_ACCESS_SECRET, TEST_REFRESH_SECRET);
    (create_app(&config), db, jwt)
}

/// POST a JSON body to the app.
pub async fn post_json(app: &axum::Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST with a Cookie header and no body.
pub async fn post_with_cookie(app: &axum::Router, uri: &str, cookie: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("cookie", cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST with no body and no headers.
pub async fn post_bare(app: &axum::Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// GET with an optional bearer token.
pub async fn get_with_bearer(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Consume a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Extract Set-Cookie headers from a response.
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Pull the refresh token value out of a response's Set-Cookie headers.
pub fn refresh_cookie_value(response: &Response<Body>) -> Option<String> {
    extract_set_cookies(response).iter().find_map(|c| {
        let rest = c.strip_prefix("refreshToken=")?;
        let value = rest.split(';').next()?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// Check if cookies contain the refresh token being cleared (Max-Age=0).
pub fn has_cleared_refresh_cookie(cookies: &[String]) -> bool {
    cookies
        .iter()
        .any(|c| c.starts_with("refreshToken=") && c.contains("Max-Age=0"))
}

/// Register a user and return (response status, parsed body, refresh cookie).
pub async fn register_user(
    app: &axum::Router,
    username: &str,
    email: &str,
    password: &str,
) -> (StatusCode, serde_json::Value, Option<String>) {
    let body = serde_json::json!({
        "username": username,
        "email": email,
        "password": password,
    });
    let response = post_json(app, "/api/auth/register", &body.to_string()).await;
    let status = response.status();
    let cookie = refresh_cookie_value(&response);
    let json = body_json(response).await;
    (status, json, cookie)
}
