//! In-memory credential store backing the test suite.
//!
//! A single mutex guards both maps, which gives every operation the same
//! atomic read-modify-write semantics the Postgres backend gets from
//! single-statement updates.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::model::{RoleProfile, User, UserRole};
use crate::store::{CredentialStore, NewUser};
use crate::utils::errors::AppError;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, RoleProfile>,
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: Mutex<Inner>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.lock();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.lock();
        Ok(inner.users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::AlreadyExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            refresh_token: String::new(),
            mfa_enabled: false,
            mfa_secret: String::new(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_refresh_token(&self, id: Uuid, token: &str) -> Result<(), AppError> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get_mut(&id) {
            user.refresh_token = token.to_string();
        }
        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        next: &str,
    ) -> Result<bool, AppError> {
        let mut inner = self.lock();
        match inner.users.get_mut(&id) {
            Some(user) if user.refresh_token == expected => {
                user.refresh_token = next.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AppError> {
        self.set_refresh_token(id, "").await
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<(), AppError> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get_mut(&id) {
            user.role = role;
        }
        Ok(())
    }

    async fn set_second_factor(
        &self,
        id: Uuid,
        enabled: bool,
        secret: &str,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();
        if let Some(user) = inner.users.get_mut(&id) {
            user.mfa_enabled = enabled;
            user.mfa_secret = secret.to_string();
        }
        Ok(())
    }

    async fn find_role_profile(&self, user_id: Uuid) -> Result<Option<RoleProfile>, AppError> {
        let inner = self.lock();
        Ok(inner.profiles.get(&user_id).cloned())
    }

    async fn upsert_role_profile(
        &self,
        user_id: Uuid,
        profile: &RoleProfile,
    ) -> Result<(), AppError> {
        let mut inner = self.lock();
        inner.profiles.insert(user_id, profile.clone());
        Ok(())
    }

    async fn delete_role_profile(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut inner = self.lock();
        inner.profiles.remove(&user_id);
        Ok(())
    }
}
