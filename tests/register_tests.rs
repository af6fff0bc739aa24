//! Registration flow tests.
//!
//! Covers the happy path (201, token subject matches the new row), field
//! validation, duplicate detection through both the pre-check and the
//! storage constraint, and the refresh cookie attributes.

mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn test_register_success() {
    let (app, db, jwt) = create_test_app().await;

    let (status, json, cookie) =
        register_user(&app, "alice", "alice@x.com", "secret123").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "alice@x.com");
    let id = json["id"].as_i64().expect("response should carry the new id");

    // Access token subject matches the row we just created
    let token = json["token"].as_str().expect("response should carry a token");
    let claims = jwt.validate_access_token(token).unwrap();
    assert_eq!(claims.sub, id.to_string());
    assert_eq!(claims.email.as_deref(), Some("alice@x.com"));

    // Refresh token went out as a cookie, not in the body
    let refresh = cookie.expect("refresh cookie should be set");
    let refresh_claims = jwt.validate_refresh_token(&refresh).unwrap();
    assert_eq!(refresh_claims.sub, id.to_string());
    assert!(json.get("refreshToken").is_none());

    // The stored hash is not the plaintext
    let user = db.users().find_by_email("alice@x.com").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_ne!(user.password_hash, "secret123");
}

#[tokio::test]
async fn test_register_cookie_attributes() {
    let (app, _db, _jwt) = create_test_app().await;

    let body = r#"{"username":"alice","email":"alice@x.com","password":"secret123"}"#;
    let response = post_json(&app, "/api/auth/register", body).await;

    let cookies = extract_set_cookies(&response);
    let refresh = cookies
        .iter()
        .find(|c| c.starts_with("refreshToken="))
        .expect("refresh cookie should be set");

    assert!(refresh.contains("HttpOnly"));
    assert!(refresh.contains("Max-Age=604800"));
    // Non-production app: Lax, no Secure flag
    assert!(refresh.contains("SameSite=Lax"));
    assert!(!refresh.contains("Secure"));
}

#[tokio::test]
async fn test_register_missing_field() {
    let (app, _db, _jwt) = create_test_app().await;

    let response = post_json(
        &app,
        "/api/auth/register",
        r#"{"username":"alice","email":"alice@x.com"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_empty_fields() {
    let (app, _db, _jwt) = create_test_app().await;

    for body in [
        r#"{"username":"","email":"alice@x.com","password":"secret123"}"#,
        r#"{"username":"alice","email":"","password":"secret123"}"#,
        r#"{"username":"alice","email":"alice@x.com","password":""}"#,
    ] {
        let response = post_json(&app, "/api/auth/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Username, email, and password are required");
    }
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (app, db, _jwt) = create_test_app().await;

    let (status, _, _) = register_user(&app, "alice", "alice@x.com", "secret123").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json, _) = register_user(&app, "alice2", "alice@x.com", "other-pass").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "User with this email already exists");

    // Never two rows with the same email
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (app, _db, _jwt) = create_test_app().await;

    let (status, _, _) = register_user(&app, "alice", "alice@x.com", "secret123").await;
    assert_eq!(status, StatusCode::CREATED);

    // Different email, same username: slips past the email pre-check and is
    // caught by the storage constraint instead. Same response either way.
    let (status, json, _) = register_user(&app, "alice", "alice2@x.com", "secret123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "User with this email already exists");
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, _db, jwt) = create_test_app().await;

    let (status, json, _) = register_user(&app, "alice", "alice@x.com", "secret123").await;
    assert_eq!(status, StatusCode::CREATED);
    let registered_id = json["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        "/api/auth/login",
        r#"{"email":"alice@x.com","password":"secret123"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["token"].as_str().unwrap();
    let claims = jwt.validate_access_token(token).unwrap();
    assert_eq!(claims.sub, registered_id.to_string());
}
