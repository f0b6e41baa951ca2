use std::sync::Arc;

use crate::config::database::init_db_pool;
use crate::config::email::EmailCheckConfig;
use crate::config::tokens::TokenConfig;
use crate::store::CredentialStore;
use crate::store::postgres::PgCredentialStore;
use crate::utils::email::{EmailVerifier, HttpEmailVerifier};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub email_verifier: Arc<dyn EmailVerifier>,
    pub token_config: TokenConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        store: Arc::new(PgCredentialStore::new(init_db_pool().await)),
        email_verifier: Arc::new(HttpEmailVerifier::new(EmailCheckConfig::from_env())),
        token_config: TokenConfig::from_env(),
    }
}

/// State wired to the in-memory store and permissive collaborators, for
/// integration tests and local experiments that need no Postgres.
#[cfg(any(test, feature = "test-utils"))]
pub fn test_app_state() -> AppState {
    use crate::store::memory::InMemoryCredentialStore;
    use crate::utils::email::AcceptAllVerifier;

    AppState {
        store: Arc::new(InMemoryCredentialStore::new()),
        email_verifier: Arc::new(AcceptAllVerifier),
        token_config: TokenConfig {
            access_secret: "test-access-secret-0123456789abcdef".to_string(),
            refresh_secret: "test-refresh-secret-0123456789abcde".to_string(),
            mfa_session_secret: "test-mfa-secret-0123456789abcdefgh".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 1_296_000,
            mfa_session_expiry: 300,
        },
    }
}
