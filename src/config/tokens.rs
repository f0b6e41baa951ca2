use std::env;

/// Signing configuration for the three token purposes.
///
/// Each purpose gets its own secret so a token minted for one purpose can
/// never validate against another purpose's verifier. Secrets are injected
/// here rather than read globally, so tests supply ephemeral keys.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub mfa_session_secret: String,
    /// Access token lifetime in seconds (15 minutes).
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds (15 days).
    pub refresh_token_expiry: i64,
    /// MFA session token lifetime in seconds (5 minutes).
    pub mfa_session_expiry: i64,
}

impl TokenConfig {
    pub fn from_env() -> Self {
        Self {
            access_secret: env::var("ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|_| "access-secret-change-in-production".to_string()),
            refresh_secret: env::var("REFRESH_TOKEN_SECRET")
                .unwrap_or_else(|_| "refresh-secret-change-in-production".to_string()),
            mfa_session_secret: env::var("MFA_SESSION_TOKEN_SECRET")
                .unwrap_or_else(|_| "mfa-session-secret-change-in-production".to_string()),
            access_token_expiry: env::var("ACCESS_TOKEN_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(900), // 15 minutes
            refresh_token_expiry: env::var("REFRESH_TOKEN_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1_296_000), // 15 days
            mfa_session_expiry: env::var("MFA_SESSION_TOKEN_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300), // 5 minutes
        }
    }
}
