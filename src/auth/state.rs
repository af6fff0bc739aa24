//! Authentication state trait.

use crate::jwt::JwtConfig;

/// Trait for router state types that provide JWT access for authentication.
/// Access-token verification is stateless, so the token config is all the
/// extractor needs.
pub trait HasAuthState {
    fn jwt(&self) -> &JwtConfig;
}
