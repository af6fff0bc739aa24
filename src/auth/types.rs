//! Authentication user types.

/// Identity extracted from a verified access token, handed to downstream
/// handlers so they can scope data access to the authenticated user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Database user ID (the token's subject claim)
    pub id: i64,
    /// Email claim, when the token carried one
    pub email: Option<String>,
}
