#![allow(dead_code)]

use tradepost::config::tokens::TokenConfig;
use tradepost::modules::auth::model::{SessionTokens, SignInOutcome};
use tradepost::modules::auth::service::AuthService;
use tradepost::modules::users::model::{UserRole, UserView};
use tradepost::store::CredentialStore;
use tradepost::store::memory::InMemoryCredentialStore;
use tradepost::utils::email::AcceptAllVerifier;

pub fn token_config() -> TokenConfig {
    TokenConfig {
        access_secret: "test-access-secret-0123456789abcdef".to_string(),
        refresh_secret: "test-refresh-secret-0123456789abcde".to_string(),
        mfa_session_secret: "test-mfa-secret-0123456789abcdefgh".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 1_296_000,
        mfa_session_expiry: 300,
    }
}

pub fn store() -> InMemoryCredentialStore {
    InMemoryCredentialStore::new()
}

/// Create an account through the real sign-up path and return its view and
/// first session. Elevated roles stand in for the privileged creation path.
pub async fn sign_up(
    store: &dyn CredentialStore,
    config: &TokenConfig,
    email: &str,
    password: &str,
    role: Option<UserRole>,
) -> (UserView, SessionTokens) {
    AuthService::sign_up(store, &AcceptAllVerifier, config, email, password, role)
        .await
        .expect("sign up should succeed")
}

/// Sign in and unwrap the fully-authenticated outcome.
pub async fn sign_in_authenticated(
    store: &dyn CredentialStore,
    config: &TokenConfig,
    email: &str,
    password: &str,
) -> SessionTokens {
    match AuthService::sign_in(store, config, email, password).await {
        Ok(SignInOutcome::Authenticated(tokens)) => tokens,
        other => panic!("expected an authenticated sign-in, got {other:?}"),
    }
}

/// Sign in and unwrap the pending-second-factor outcome.
pub async fn sign_in_mfa_pending(
    store: &dyn CredentialStore,
    config: &TokenConfig,
    email: &str,
    password: &str,
) -> String {
    match AuthService::sign_in(store, config, email, password).await {
        Ok(SignInOutcome::SecondFactorRequired { mfa_session_token }) => mfa_session_token,
        other => panic!("expected a second-factor challenge, got {other:?}"),
    }
}
