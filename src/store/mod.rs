//! Credential persistence.
//!
//! The services never touch a database directly; they speak to a
//! [`CredentialStore`]. The production backend is [`postgres::PgCredentialStore`];
//! the test suite runs against [`memory::InMemoryCredentialStore`].
//!
//! The store owns all persisted identity state. Tokens themselves are never
//! persisted; only the currently-valid refresh token string is stored per
//! user, and [`CredentialStore::swap_refresh_token`] replaces it atomically so
//! concurrent refresh calls cannot both rotate from the same prior token.

use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::model::{RoleProfile, User, UserRole};
use crate::utils::errors::AppError;

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

/// Fields required to create a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    /// `None` for accounts created via federated identity.
    pub password_hash: Option<String>,
    pub role: UserRole,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Insert a new account. A duplicate email fails with
    /// [`AppError::AlreadyExists`], backed by a unique constraint so the
    /// check-then-insert race cannot create two records.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Unconditionally store a new refresh token (sign-in, second-factor
    /// completion).
    async fn set_refresh_token(&self, id: Uuid, token: &str) -> Result<(), AppError>;

    /// Atomically replace the stored refresh token with `next`, but only if
    /// the current value equals `expected`. Returns `false` when the stored
    /// value did not match; the caller treats that as reuse of a stale token.
    async fn swap_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        next: &str,
    ) -> Result<bool, AppError>;

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AppError>;

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<(), AppError>;

    /// Persist the second-factor state. Callers uphold the invariant that
    /// `enabled` implies a non-empty `secret`.
    async fn set_second_factor(
        &self,
        id: Uuid,
        enabled: bool,
        secret: &str,
    ) -> Result<(), AppError>;

    async fn find_role_profile(&self, user_id: Uuid) -> Result<Option<RoleProfile>, AppError>;

    async fn upsert_role_profile(
        &self,
        user_id: Uuid,
        profile: &RoleProfile,
    ) -> Result<(), AppError>;

    /// Remove the user's role profile, whatever its variant. A no-op when no
    /// profile exists.
    async fn delete_role_profile(&self, user_id: Uuid) -> Result<(), AppError>;
}
