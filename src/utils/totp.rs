//! TOTP secret generation and code verification.
//!
//! Secrets are 20 random bytes, base32-encoded for authenticator apps.
//! Verification runs the standard TOTP algorithm (SHA-1, 6 digits, 30 s step)
//! with a skew of one step either side of the current window, so codes
//! generated at a window boundary are not falsely rejected.

use totp_rs::{Algorithm, Secret, TOTP};

use crate::utils::errors::AppError;

const ISSUER: &str = "Tradepost";

/// Generate a fresh base32-encoded enrollment secret.
pub fn generate_mfa_secret() -> String {
    use rand::RngCore;
    let mut rng = rand::thread_rng();
    let mut bytes = vec![0u8; 20];
    rng.fill_bytes(&mut bytes);
    Secret::Raw(bytes).to_encoded().to_string()
}

fn build_totp(secret: &str, account: &str) -> Result<TOTP, AppError> {
    let secret_bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|e| AppError::internal(anyhow::anyhow!("invalid TOTP secret: {e:?}")))?;

    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        secret_bytes,
        Some(ISSUER.to_string()),
        account.to_string(),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("failed to build TOTP: {e}")))
}

/// Check a submitted code against the stored secret at the current time,
/// tolerating one step of clock drift either way.
pub fn verify_code(secret: &str, code: &str, account: &str) -> Result<bool, AppError> {
    let totp = build_totp(secret, account)?;
    totp.check_current(code)
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to verify TOTP code: {e}")))
}

/// otpauth:// provisioning URL shown to the user at enrollment.
pub fn provisioning_url(secret: &str, account: &str) -> Result<String, AppError> {
    Ok(build_totp(secret, account)?.get_url())
}

/// Compute the current code for a secret. Test helper for driving the
/// verification flow without an authenticator app.
#[cfg(any(test, feature = "test-utils"))]
pub fn current_code(secret: &str, account: &str) -> Result<String, AppError> {
    let totp = build_totp(secret, account)?;
    totp.generate_current()
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to generate TOTP code: {e}")))
}
