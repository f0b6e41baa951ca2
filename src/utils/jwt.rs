//! Signed, expiring token mint/verify for the three token purposes.
//!
//! Access, refresh, and MFA-session tokens each sign against their own secret
//! from [`TokenConfig`], so a token minted for one purpose can never validate
//! against another purpose's verifier. Verification always checks signature
//! and expiry, and reports them as distinct [`TokenError`] kinds: clients
//! retry an expired access token through the refresh flow, while a malformed
//! or wrong-purpose token is a hard rejection.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::config::tokens::TokenConfig;
use crate::modules::users::model::UserRole;

/// Verification failure, split so callers can respond differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature and structure were fine, but the token is past its expiry.
    Expired,
    /// Bad signature, malformed structure, or missing required claims.
    Invalid,
}

/// Claims carried by an access token.
///
/// Deserialization enforces the claim shape: a token whose payload is missing
/// `sub`, `email`, or `role` fails verification even with a valid signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Claims carried by a refresh token.
///
/// Deliberately carries no role or email: the role can change between
/// issuance and use and is always re-read from storage. `jti` makes every
/// minted refresh token a distinct string, so rotation always produces a
/// fresh stored fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// Claims carried by an MFA session token: primary credentials already
/// checked, second factor pending. Never accepted where an access token is
/// required (separate signing secret).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfaSessionClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

fn mint<C: Serialize>(claims: &C, secret: &str) -> Result<String, anyhow::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("failed to encode token: {e}"))
}

fn verify<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    config: &TokenConfig,
) -> Result<String, anyhow::Error> {
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + config.access_token_expiry) as usize,
        iat: now as usize,
    };
    mint(&claims, &config.access_secret)
}

pub fn verify_access_token(token: &str, config: &TokenConfig) -> Result<AccessClaims, TokenError> {
    verify(token, &config.access_secret)
}

pub fn create_refresh_token(user_id: Uuid, config: &TokenConfig) -> Result<String, anyhow::Error> {
    let now = Utc::now().timestamp();
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        exp: (now + config.refresh_token_expiry) as usize,
        iat: now as usize,
        jti: Uuid::new_v4().to_string(),
    };
    mint(&claims, &config.refresh_secret)
}

pub fn verify_refresh_token(
    token: &str,
    config: &TokenConfig,
) -> Result<RefreshClaims, TokenError> {
    verify(token, &config.refresh_secret)
}

pub fn create_mfa_session_token(
    user_id: Uuid,
    config: &TokenConfig,
) -> Result<String, anyhow::Error> {
    let now = Utc::now().timestamp();
    let claims = MfaSessionClaims {
        sub: user_id.to_string(),
        exp: (now + config.mfa_session_expiry) as usize,
        iat: now as usize,
    };
    mint(&claims, &config.mfa_session_secret)
}

pub fn verify_mfa_session_token(
    token: &str,
    config: &TokenConfig,
) -> Result<MfaSessionClaims, TokenError> {
    verify(token, &config.mfa_session_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig {
            access_secret: "access-test-secret-at-least-32-chars!".to_string(),
            refresh_secret: "refresh-test-secret-at-least-32-chars".to_string(),
            mfa_session_secret: "mfa-test-secret-at-least-32-chars!!!".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 1_296_000,
            mfa_session_expiry: 300,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token =
            create_access_token(user_id, "test@example.com", UserRole::Staff, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, UserRole::Staff);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_has_no_role_or_email() {
        let config = test_config();
        let token = create_refresh_token(Uuid::new_v4(), &config).unwrap();

        // Decode the full payload as a raw map to inspect which claims exist.
        let raw: serde_json::Value = verify(&token, &config.refresh_secret).unwrap();
        assert!(raw.get("role").is_none());
        assert!(raw.get("email").is_none());
        assert!(raw.get("jti").is_some());
    }

    #[test]
    fn test_two_refresh_tokens_are_distinct() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let first = create_refresh_token(user_id, &config).unwrap();
        let second = create_refresh_token(user_id, &config).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_cross_purpose_rejection() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let refresh = create_refresh_token(user_id, &config).unwrap();
        assert_eq!(
            verify_access_token(&refresh, &config).unwrap_err(),
            TokenError::Invalid
        );

        let mfa = create_mfa_session_token(user_id, &config).unwrap();
        assert_eq!(
            verify_access_token(&mfa, &config).unwrap_err(),
            TokenError::Invalid
        );

        let access =
            create_access_token(user_id, "a@example.com", UserRole::Customer, &config).unwrap();
        assert_eq!(
            verify_refresh_token(&access, &config).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let config = test_config();
        let mut other = test_config();
        other.access_secret = "a-completely-different-signing-key!!!".to_string();

        let token =
            create_access_token(Uuid::new_v4(), "a@example.com", UserRole::Admin, &config).unwrap();
        assert_eq!(
            verify_access_token(&token, &other).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let config = test_config();
        assert_eq!(
            verify_access_token("not.a.token", &config).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            verify_refresh_token("", &config).unwrap_err(),
            TokenError::Invalid
        );
    }
}
