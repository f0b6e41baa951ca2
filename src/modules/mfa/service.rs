//! Second-factor enrollment, verification, and disablement.
//!
//! Only staff and admin accounts carry a second factor. Enrollment persists
//! the secret with `mfa_enabled = true` immediately, before the user has
//! proven possession: the very next sign-in already demands a code. A user
//! who loses the secret mid-enrollment can re-enroll from an authenticated
//! session or have an admin reset the role.

use tracing::instrument;
use uuid::Uuid;

use crate::config::tokens::TokenConfig;
use crate::modules::auth::model::SessionTokens;
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::User;
use crate::store::CredentialStore;
use crate::utils::errors::AppError;
use crate::utils::totp::{generate_mfa_secret, provisioning_url, verify_code};

use super::model::{EnrollMfaResponse, MfaStatusResponse};

pub struct MfaService;

impl MfaService {
    async fn load_eligible(
        store: &dyn CredentialStore,
        user_id: Uuid,
    ) -> Result<User, AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        if !user.role.second_factor_eligible() {
            return Err(AppError::unauthorized(
                "two-factor authentication is available to staff and admin accounts only",
            ));
        }
        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn status(
        store: &dyn CredentialStore,
        user_id: Uuid,
    ) -> Result<MfaStatusResponse, AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        Ok(MfaStatusResponse {
            mfa_enabled: user.mfa_enabled,
        })
    }

    /// Generate and persist a new secret, enabled immediately.
    ///
    /// Re-enrolling replaces any previous secret; old authenticator entries
    /// stop working at that point.
    #[instrument(skip(store))]
    pub async fn enroll(
        store: &dyn CredentialStore,
        user_id: Uuid,
    ) -> Result<EnrollMfaResponse, AppError> {
        let user = Self::load_eligible(store, user_id).await?;

        let secret = generate_mfa_secret();
        store.set_second_factor(user.id, true, &secret).await?;

        let otpauth_url = provisioning_url(&secret, &user.email)?;
        Ok(EnrollMfaResponse {
            secret,
            otpauth_url,
        })
    }

    /// Check a submitted code and, on success, complete the sign-in exactly
    /// as a password-only sign-in would have: a fresh access/refresh pair is
    /// minted and the new refresh token becomes the account's live session.
    #[instrument(skip(store, tokens, code))]
    pub async fn verify(
        store: &dyn CredentialStore,
        tokens: &TokenConfig,
        user_id: Uuid,
        code: &str,
    ) -> Result<SessionTokens, AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        if !user.mfa_enabled {
            return Err(AppError::NotEnabled);
        }

        if !verify_code(&user.mfa_secret, code, &user.email)? {
            return Err(AppError::InvalidCode);
        }

        AuthService::open_session(store, tokens, &user).await
    }

    /// Clear the second factor unconditionally for staff/admin.
    #[instrument(skip(store))]
    pub async fn disable(store: &dyn CredentialStore, user_id: Uuid) -> Result<(), AppError> {
        let user = Self::load_eligible(store, user_id).await?;
        store.set_second_factor(user.id, false, "").await
    }
}
