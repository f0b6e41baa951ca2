//! Session lifecycle: sign-up, sign-in, refresh rotation, logout.
//!
//! From a caller's point of view a session moves through
//! `Unauthenticated -> PrimaryVerified -> (SecondFactorPending | FullyAuthenticated)`.
//! Customers and suppliers go straight to fully authenticated on a correct
//! password; staff and admins with a second factor enrolled stop at pending
//! and finish through [`crate::modules::mfa::service::MfaService::verify`].

use tracing::instrument;
use uuid::Uuid;

use crate::config::tokens::TokenConfig;
use crate::modules::users::model::{CustomerProfile, RoleProfile, User, UserRole, UserView};
use crate::store::{CredentialStore, NewUser};
use crate::utils::email::EmailVerifier;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_mfa_session_token, create_refresh_token};
use crate::utils::password::{hash_password, verify_password};

use super::model::{FederatedIdentity, SessionTokens, SignInOutcome};

pub struct AuthService;

impl AuthService {
    /// Mint an access/refresh pair and persist the new refresh token as the
    /// account's single live session. Shared by sign-up, sign-in, and
    /// second-factor completion.
    pub(crate) async fn open_session(
        store: &dyn CredentialStore,
        tokens: &TokenConfig,
        user: &User,
    ) -> Result<SessionTokens, AppError> {
        let access_token = create_access_token(user.id, &user.email, user.role, tokens)?;
        let refresh_token = create_refresh_token(user.id, tokens)?;
        store.set_refresh_token(user.id, &refresh_token).await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Create an account and open its first session.
    ///
    /// The deliverability check runs before anything is written and fails
    /// closed. The default role is customer; an elevated `requested_role` is
    /// only honored here, the decision of who may ask for one belongs to the
    /// privileged caller.
    #[instrument(skip(store, email_verifier, tokens, password))]
    pub async fn sign_up(
        store: &dyn CredentialStore,
        email_verifier: &dyn EmailVerifier,
        tokens: &TokenConfig,
        email: &str,
        password: &str,
        requested_role: Option<UserRole>,
    ) -> Result<(UserView, SessionTokens), AppError> {
        if !email_verifier.is_deliverable(email).await? {
            return Err(AppError::validation(
                "provide a valid / active email address",
            ));
        }

        if store.find_by_email(email).await?.is_some() {
            return Err(AppError::AlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let user = store
            .create(NewUser {
                email: email.to_string(),
                password_hash: Some(password_hash),
                role: requested_role.unwrap_or_default(),
            })
            .await?;

        let session = Self::open_session(store, tokens, &user).await?;
        Ok((UserView::from(&user), session))
    }

    #[instrument(skip(store, tokens, password))]
    pub async fn sign_in(
        store: &dyn CredentialStore,
        tokens: &TokenConfig,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, AppError> {
        let user = store
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        let digest = user
            .password_hash
            .as_deref()
            .ok_or(AppError::OAuthOnlyAccount)?;

        if !verify_password(password, digest)? {
            return Err(AppError::PasswordMismatch);
        }

        Self::gate_second_factor(store, tokens, &user).await
    }

    /// Sign in through an identity already verified by an external provider.
    ///
    /// Equivalent to a successful password check: no password comparison runs,
    /// but the staff/admin second-factor gate still applies. First contact
    /// creates a password-less customer account seeded with a profile from
    /// the provider's display name.
    #[instrument(skip(store, tokens, identity), fields(provider_id = %identity.provider_id))]
    pub async fn federated_sign_in(
        store: &dyn CredentialStore,
        tokens: &TokenConfig,
        identity: FederatedIdentity,
    ) -> Result<SignInOutcome, AppError> {
        let user = match store.find_by_email(&identity.email).await? {
            Some(user) => user,
            None => {
                let user = store
                    .create(NewUser {
                        email: identity.email.clone(),
                        password_hash: None,
                        role: UserRole::Customer,
                    })
                    .await?;
                let profile = RoleProfile::Customer(CustomerProfile::from_display_name(
                    &identity.display_name,
                ));
                store.upsert_role_profile(user.id, &profile).await?;
                user
            }
        };

        Self::gate_second_factor(store, tokens, &user).await
    }

    async fn gate_second_factor(
        store: &dyn CredentialStore,
        tokens: &TokenConfig,
        user: &User,
    ) -> Result<SignInOutcome, AppError> {
        if user.role.second_factor_eligible() && user.mfa_enabled {
            let mfa_session_token = create_mfa_session_token(user.id, tokens)?;
            return Ok(SignInOutcome::SecondFactorRequired { mfa_session_token });
        }

        let session = Self::open_session(store, tokens, user).await?;
        Ok(SignInOutcome::Authenticated(session))
    }

    /// Rotate the session: every successful refresh replaces both tokens and
    /// the stored refresh token, so each refresh token is usable exactly once.
    ///
    /// A presented token that does not match the stored one is a reuse or
    /// tamper signal. The stored token is cleared before the error surfaces,
    /// which invalidates the whole session, including whichever token the
    /// attacker or the legitimate client still holds.
    #[instrument(skip(store, tokens, presented))]
    pub async fn refresh(
        store: &dyn CredentialStore,
        tokens: &TokenConfig,
        user_id: Uuid,
        presented: &str,
    ) -> Result<SessionTokens, AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        // Role and email come from the freshly loaded record, never from the
        // refresh token, so a role change is reflected in the next pair.
        let access_token = create_access_token(user.id, &user.email, user.role, tokens)?;
        let refresh_token = create_refresh_token(user.id, tokens)?;

        let rotated = store
            .swap_refresh_token(user.id, presented, &refresh_token)
            .await?;
        if !rotated {
            store.clear_refresh_token(user.id).await?;
            return Err(AppError::TokenReuseDetected);
        }

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Clear the stored refresh token. Idempotent: logging out twice, or with
    /// no live session, is fine.
    #[instrument(skip(store))]
    pub async fn logout(store: &dyn CredentialStore, user_id: Uuid) -> Result<(), AppError> {
        store.clear_refresh_token(user_id).await
    }
}
