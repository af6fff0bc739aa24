//! Refresh-token cookie construction and parsing.

use axum::http::header;

use crate::jwt::REFRESH_TOKEN_DURATION_SECS;

/// Cookie name for the refresh token (long-lived, 7 days).
/// The refresh token travels only in this HTTP-only cookie, never in a
/// JSON body.
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Build the Set-Cookie value carrying a refresh token.
///
/// `SameSite=None; Secure` when serving the cross-origin production
/// frontend over HTTPS, `SameSite=Lax` otherwise.
pub fn refresh_cookie(token: &str, secure: bool) -> String {
    if secure {
        format!(
            "{}={}; HttpOnly; SameSite=None; Path=/; Max-Age={}; Secure",
            REFRESH_COOKIE_NAME, token, REFRESH_TOKEN_DURATION_SECS
        )
    } else {
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            REFRESH_COOKIE_NAME, token, REFRESH_TOKEN_DURATION_SECS
        )
    }
}

/// Build the Set-Cookie value that clears the refresh cookie.
pub fn clear_refresh_cookie(secure: bool) -> String {
    if secure {
        format!(
            "{}=; HttpOnly; SameSite=None; Path=/; Max-Age=0; Secure",
            REFRESH_COOKIE_NAME
        )
    } else {
        format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
            REFRESH_COOKIE_NAME
        )
    }
}

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}
