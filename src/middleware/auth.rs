//! Request authentication extractors.
//!
//! The gate is transport-agnostic about where the token rides: the
//! `Authorization: Bearer` header and the corresponding cookie are both
//! accepted, header first. Verification distinguishes an expired token
//! (client should refresh) from an invalid one (hard rejection).

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::config::tokens::TokenConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{
    AccessClaims, MfaSessionClaims, verify_access_token, verify_mfa_session_token,
};

/// Verify a presented access token and return its claims.
///
/// Claims deserialization rejects any token missing `sub`, `email`, or
/// `role`, so a signature-valid token with a drifted claim shape never
/// authenticates.
pub fn authenticate(token: &str, config: &TokenConfig) -> Result<AccessClaims, AppError> {
    Ok(verify_access_token(token, config)?)
}

fn bearer_or_cookie(parts: &Parts, cookie_name: &str) -> Option<String> {
    let header_token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = header_token {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}

/// Extractor that validates the access token and provides the authenticated
/// caller's claims to the handler.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub).map_err(|_| AppError::TokenInvalid)
    }

    pub fn role(&self) -> crate::modules::users::model::UserRole {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_or_cookie(parts, "access_token")
            .ok_or_else(|| AppError::unauthorized("missing access token"))?;

        let claims = authenticate(&token, &state.token_config)?;
        Ok(AuthUser(claims))
    }
}

/// Extractor for the pending-second-factor state.
///
/// Accepts only an MFA session token, which is signed with its own secret; an
/// access or refresh token presented here fails verification, and this token
/// is never accepted by [`AuthUser`].
#[derive(Debug, Clone)]
pub struct MfaSession(pub MfaSessionClaims);

impl MfaSession {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub).map_err(|_| AppError::TokenInvalid)
    }
}

impl FromRequestParts<AppState> for MfaSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_or_cookie(parts, "mfa_session_token")
            .ok_or_else(|| AppError::unauthorized("missing MFA session token"))?;

        let claims = verify_mfa_session_token(&token, &state.token_config)?;
        Ok(MfaSession(claims))
    }
}
