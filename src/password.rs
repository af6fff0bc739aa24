//! Password hashing and verification.
//!
//! bcrypt with a fixed cost and a fresh salt per call. The produced hash
//! string self-describes salt and cost, so verification needs nothing but
//! the stored string.

/// bcrypt work factor for newly created hashes.
pub const HASH_COST: u32 = 10;

/// Hash a plaintext password.
pub fn hash(plain: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plain, HASH_COST).map_err(PasswordError::Hashing)
}

/// Verify a plaintext password against a stored hash.
/// A mismatch is `Ok(false)`; `Err` means the primitive itself failed,
/// e.g. the stored hash is not a parseable bcrypt string.
pub fn verify(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, hash).map_err(PasswordError::Hashing)
}

/// Errors from the underlying hashing primitive.
#[derive(Debug)]
pub enum PasswordError {
    Hashing(bcrypt::BcryptError),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Hashing(e) => write!(f, "Password hashing failed: {}", e),
        }
    }
}

impl std::error::Error for PasswordError {}
