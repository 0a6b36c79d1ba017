//! Password hashing and verification.

use crate::error::AppError;

/// Hash a password using bcrypt. A fresh salt is generated per call, so
/// hashing the same password twice yields different strings; equality on
/// hashes must never be used to check a password.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored hash. A malformed or unparseable
/// hash counts as a failed verification rather than an error, so callers
/// cannot distinguish a bad stored hash from a wrong password.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
