//! External email deliverability check, consulted during sign-up.
//!
//! The check is fail-closed: if the upstream verification service cannot be
//! reached or answers with garbage, sign-up fails with
//! [`AppError::DependencyUnavailable`] rather than letting an unverifiable
//! address through.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::config::email::EmailCheckConfig;
use crate::utils::errors::AppError;

#[async_trait]
pub trait EmailVerifier: Send + Sync {
    /// Returns whether the address is considered deliverable.
    async fn is_deliverable(&self, email: &str) -> Result<bool, AppError>;
}

/// [`EmailVerifier`] backed by an HTTP deliverability API.
pub struct HttpEmailVerifier {
    client: reqwest::Client,
    config: EmailCheckConfig,
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    #[serde(rename = "Status")]
    status: String,
}

impl HttpEmailVerifier {
    pub fn new(config: EmailCheckConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EmailVerifier for HttpEmailVerifier {
    #[instrument(skip(self))]
    async fn is_deliverable(&self, email: &str) -> Result<bool, AppError> {
        let url = format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            email,
            self.config.api_key
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(error = %e, "email verification request failed");
            AppError::DependencyUnavailable
        })?;

        let verdict: VerificationResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "email verification returned an unreadable body");
            AppError::DependencyUnavailable
        })?;

        Ok(verdict.status == "Valid")
    }
}

/// Verifier that accepts every address. Used by the test suite and by local
/// setups that have no verification API configured.
#[cfg(any(test, feature = "test-utils"))]
pub struct AcceptAllVerifier;

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl EmailVerifier for AcceptAllVerifier {
    async fn is_deliverable(&self, _email: &str) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Verifier that always fails with [`AppError::DependencyUnavailable`].
/// Exercises the fail-closed sign-up path in tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct UnavailableVerifier;

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl EmailVerifier for UnavailableVerifier {
    async fn is_deliverable(&self, _email: &str) -> Result<bool, AppError> {
        Err(AppError::DependencyUnavailable)
    }
}

/// Verifier that rejects every address as undeliverable.
#[cfg(any(test, feature = "test-utils"))]
pub struct RejectAllVerifier;

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl EmailVerifier for RejectAllVerifier {
    async fn is_deliverable(&self, _email: &str) -> Result<bool, AppError> {
        Ok(false)
    }
}
