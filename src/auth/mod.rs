//! Bearer-token authentication.
//!
//! Dual-token system: short-lived access tokens (1 hour, `Authorization:
//! Bearer` header) and long-lived refresh tokens (7 days, HTTP-only
//! cookie). Access tokens are stateless; nothing is tracked server-side.

mod cookie;
mod errors;
mod extractors;
mod state;
mod types;

pub use cookie::{REFRESH_COOKIE_NAME, clear_refresh_cookie, get_cookie, refresh_cookie};
pub use errors::AuthError;
pub use extractors::Auth;
pub use state::HasAuthState;
pub use types::AuthenticatedUser;
