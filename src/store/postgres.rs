//! PostgreSQL credential store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::users::model::{RoleProfile, User, UserRole};
use crate::store::{CredentialStore, NewUser};
use crate::utils::errors::AppError;

const USER_COLUMNS: &str =
    "id, email, password_hash, role, refresh_token, mfa_enabled, mfa_secret";

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::AlreadyExists
            } else {
                AppError::from(e)
            }
        })?;

        Ok(user)
    }

    async fn set_refresh_token(&self, id: Uuid, token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        next: &str,
    ) -> Result<bool, AppError> {
        // The WHERE clause makes the compare-and-swap a single atomic
        // statement; of two concurrent refreshes only one can match.
        let result =
            sqlx::query("UPDATE users SET refresh_token = $3 WHERE id = $1 AND refresh_token = $2")
                .bind(id)
                .bind(expected)
                .bind(next)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AppError> {
        self.set_refresh_token(id, "").await
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_second_factor(
        &self,
        id: Uuid,
        enabled: bool,
        secret: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET mfa_enabled = $2, mfa_secret = $3 WHERE id = $1")
            .bind(id)
            .bind(enabled)
            .bind(secret)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_role_profile(&self, user_id: Uuid) -> Result<Option<RoleProfile>, AppError> {
        #[derive(sqlx::FromRow)]
        struct ProfileRow {
            data: serde_json::Value,
        }

        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT data FROM role_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            serde_json::from_value(r.data)
                .map_err(|e| AppError::internal(anyhow::anyhow!("corrupt role profile: {e}")))
        })
        .transpose()
    }

    async fn upsert_role_profile(
        &self,
        user_id: Uuid,
        profile: &RoleProfile,
    ) -> Result<(), AppError> {
        let data = serde_json::to_value(profile)
            .map_err(|e| AppError::internal(anyhow::anyhow!("unserializable profile: {e}")))?;

        sqlx::query(
            "INSERT INTO role_profiles (user_id, role, data)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role, data = EXCLUDED.data",
        )
        .bind(user_id)
        .bind(profile.role())
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_role_profile(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
