//! Password hashing and verification.
//!
//! Hashing is done with bcrypt at the default cost. Hashing happens exactly
//! once, at the sign-up / set-password call sites; the store only exposes
//! field-scoped updates, so re-saving a user for unrelated reasons can never
//! re-hash an already-hashed value.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::utils::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to hash password: {e}")))
}

/// Constant-time comparison of a plaintext password against a stored digest.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to verify password: {e}")))
}
