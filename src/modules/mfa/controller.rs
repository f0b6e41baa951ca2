use axum::Json;
use axum::extract::State;

use crate::middleware::auth::{AuthUser, MfaSession};
use crate::modules::auth::model::{LoginResponse, MessageResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{EnrollMfaResponse, MfaStatusResponse, VerifyMfaRequest};
use super::service::MfaService;

/// Get second-factor enrollment status
#[utoipa::path(
    get,
    path = "/api/mfa/status",
    responses(
        (status = 200, description = "Status retrieved", body = MfaStatusResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "MFA",
    security(("bearer_auth" = []))
)]
pub async fn status(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MfaStatusResponse>, AppError> {
    let response = MfaService::status(state.store.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(response))
}

/// Enroll a second factor (staff/admin only)
#[utoipa::path(
    post,
    path = "/api/mfa/enroll",
    responses(
        (status = 200, description = "Secret generated and enabled", body = EnrollMfaResponse),
        (status = 401, description = "Unauthorized or ineligible role")
    ),
    tag = "MFA",
    security(("bearer_auth" = []))
)]
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<EnrollMfaResponse>, AppError> {
    let response = MfaService::enroll(state.store.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(response))
}

/// Complete a pending sign-in with an authenticator code
#[utoipa::path(
    post,
    path = "/api/mfa/verify",
    request_body = VerifyMfaRequest,
    responses(
        (status = 200, description = "Second factor satisfied, session opened", body = LoginResponse),
        (status = 400, description = "Wrong code or MFA not enabled"),
        (status = 401, description = "Missing or expired MFA session token")
    ),
    tag = "MFA"
)]
pub async fn verify(
    State(state): State<AppState>,
    session: MfaSession,
    ValidatedJson(dto): ValidatedJson<VerifyMfaRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let tokens = MfaService::verify(
        state.store.as_ref(),
        &state.token_config,
        session.user_id()?,
        &dto.code,
    )
    .await?;

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Disable the second factor (staff/admin only)
#[utoipa::path(
    post,
    path = "/api/mfa/disable",
    responses(
        (status = 200, description = "Second factor disabled", body = MessageResponse),
        (status = 401, description = "Unauthorized or ineligible role")
    ),
    tag = "MFA",
    security(("bearer_auth" = []))
)]
pub async fn disable(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    MfaService::disable(state.store.as_ref(), auth_user.user_id()?).await?;
    Ok(Json(MessageResponse {
        message: "two-factor authentication disabled, enable it again to keep your account protected"
            .to_string(),
    }))
}
