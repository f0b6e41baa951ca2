use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{RoleProfile, UpdateRoleRequest, UserDetailsResponse};
use super::service::UserService;

/// Get your own account and profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own details", body = UserDetailsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_self_details(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserDetailsResponse>, AppError> {
    let response = UserService::get_self_details(state.store.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(response))
}

/// Update your role profile
#[utoipa::path(
    put,
    path = "/api/users/me/details",
    request_body = RoleProfile,
    responses(
        (status = 200, description = "Profile updated", body = RoleProfile),
        (status = 401, description = "Unauthorized or stale role"),
        (status = 403, description = "Payload role does not match account role")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_details(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(profile): ValidatedJson<RoleProfile>,
) -> Result<Json<RoleProfile>, AppError> {
    let updated = UserService::update_details(
        state.store.as_ref(),
        auth_user.user_id()?,
        auth_user.role(),
        profile,
    )
    .await?;

    Ok(Json(updated))
}

/// Get another user's details (staff: customers only; admin: anyone)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "User details", body = UserDetailsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed for this role pairing")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_details(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDetailsResponse>, AppError> {
    let response = UserService::get_details(state.store.as_ref(), auth_user.role(), id).await?;
    Ok(Json(response))
}

/// Change a user's role (admin only)
#[utoipa::path(
    put,
    path = "/api/users/role",
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated, target's session invalidated", body = MessageResponse),
        (status = 400, description = "Unknown user"),
        (status = 403, description = "Admin role required")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::update_role(state.store.as_ref(), dto.user_id, dto.role).await?;

    Ok(Json(MessageResponse {
        message: format!("role updated to {}", dto.role.as_str()),
    }))
}
