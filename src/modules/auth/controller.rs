use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_refresh_token;
use crate::validator::ValidatedJson;

use super::model::{
    LoginRequest, LoginResponse, MessageResponse, MfaRequiredResponse, RefreshRequest,
    RegisterRequest, RegisterResponse, SignInOutcome,
};
use super::service::AuthService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

/// Pull the refresh token from the cookie or, failing that, the body.
fn presented_refresh_token(jar: &CookieJar, body: Option<RefreshRequest>) -> Option<String> {
    jar.get("refresh_token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|b| b.refresh_token))
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session opened", body = RegisterResponse),
        (status = 400, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 503, description = "Email verification unavailable", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let (user, tokens) = AuthService::sign_up(
        state.store.as_ref(),
        state.email_verifier.as_ref(),
        &state.token_config,
        &dto.email,
        &dto.password,
        None,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }),
    ))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 200, description = "Second factor required", body = MfaRequiredResponse),
        (status = 400, description = "Unknown account or wrong password", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<axum::response::Response, AppError> {
    let outcome = AuthService::sign_in(
        state.store.as_ref(),
        &state.token_config,
        &dto.email,
        &dto.password,
    )
    .await?;

    Ok(match outcome {
        SignInOutcome::Authenticated(tokens) => Json(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
        .into_response(),
        SignInOutcome::SecondFactorRequired { mfa_session_token } => Json(MfaRequiredResponse {
            mfa_required: true,
            mfa_session_token,
        })
        .into_response(),
    })
}

/// Rotate the access/refresh pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = LoginResponse),
        (status = 401, description = "Missing, expired, or invalid refresh token", body = ErrorResponse),
        (status = 409, description = "Stale refresh token, session invalidated", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = presented_refresh_token(&jar, body.map(|Json(b)| b))
        .ok_or_else(|| AppError::unauthorized("missing refresh token"))?;

    let claims = verify_refresh_token(&token, &state.token_config)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::TokenInvalid)?;

    let tokens =
        AuthService::refresh(state.store.as_ref(), &state.token_config, user_id, &token).await?;

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Log out, invalidating the live session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<MessageResponse>, AppError> {
    let token = presented_refresh_token(&jar, body.map(|Json(b)| b))
        .ok_or_else(|| AppError::unauthorized("missing refresh token"))?;

    let claims = verify_refresh_token(&token, &state.token_config)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::TokenInvalid)?;

    AuthService::logout(state.store.as_ref(), user_id).await?;

    Ok(Json(MessageResponse {
        message: "logout successful".to_string(),
    }))
}
