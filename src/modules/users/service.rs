//! User detail reads, profile updates, and the privileged role change.

use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::check_details_access;
use crate::modules::users::model::{RoleProfile, UserDetailsResponse, UserRole, UserView};
use crate::store::CredentialStore;
use crate::utils::errors::AppError;

pub struct UserService;

impl UserService {
    #[instrument(skip(store))]
    pub async fn get_self_details(
        store: &dyn CredentialStore,
        user_id: Uuid,
    ) -> Result<UserDetailsResponse, AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        let details = store.find_role_profile(user.id).await?;

        Ok(UserDetailsResponse {
            user: UserView::from(&user),
            details,
        })
    }

    /// Read another user's details, subject to the cross-role read policy.
    #[instrument(skip(store))]
    pub async fn get_details(
        store: &dyn CredentialStore,
        caller_role: UserRole,
        target_id: Uuid,
    ) -> Result<UserDetailsResponse, AppError> {
        let target = store
            .find_by_id(target_id)
            .await?
            .ok_or(AppError::NotFound)?;

        check_details_access(caller_role, target.role)?;

        let details = store.find_role_profile(target.id).await?;
        Ok(UserDetailsResponse {
            user: UserView::from(&target),
            details,
        })
    }

    /// Upsert the caller's role profile.
    ///
    /// The token's role must still match the stored role; a mismatch means
    /// the role changed after the token was minted, so the session is cleared
    /// and the caller must sign in again. The payload's own role tag must
    /// match as well.
    #[instrument(skip(store, profile))]
    pub async fn update_details(
        store: &dyn CredentialStore,
        user_id: Uuid,
        token_role: UserRole,
        profile: RoleProfile,
    ) -> Result<RoleProfile, AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        if token_role != user.role {
            store.clear_refresh_token(user.id).await?;
            return Err(AppError::unauthorized("role changed, sign in again"));
        }

        if profile.role() != user.role {
            return Err(AppError::forbidden(
                "profile payload does not match your role",
            ));
        }

        store.upsert_role_profile(user.id, &profile).await?;
        Ok(profile)
    }

    /// Change a user's role (privileged).
    ///
    /// The old role's profile is deleted, the live session is cleared so the
    /// user re-authenticates under the new role, and any second-factor state
    /// is dropped: re-enabling after a role change is a fresh enrollment.
    #[instrument(skip(store))]
    pub async fn update_role(
        store: &dyn CredentialStore,
        user_id: Uuid,
        new_role: UserRole,
    ) -> Result<(), AppError> {
        let user = store.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        store.delete_role_profile(user.id).await?;
        store.clear_refresh_token(user.id).await?;
        store.set_second_factor(user.id, false, "").await?;
        store.set_role(user.id, new_role).await?;

        Ok(())
    }
}
