//! Application error type and HTTP response conversion.
//!
//! Every fallible operation in the services surfaces an [`AppError`]. Each
//! variant carries a stable machine-readable code alongside a human message,
//! so API clients can branch on `code` without parsing prose. Internal causes
//! (database, codec, hashing, outbound HTTP) are wrapped in [`AppError::Internal`]
//! and are never echoed to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::utils::jwt::TokenError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("an account with this email already exists")]
    AlreadyExists,
    #[error("no account found for this email")]
    NotFound,
    #[error("incorrect password")]
    PasswordMismatch,
    #[error("this account has no local password; sign in through your identity provider")]
    OAuthOnlyAccount,
    #[error("invalid authenticator code")]
    InvalidCode,
    #[error("two-factor authentication is not enabled for this account")]
    NotEnabled,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    TokenInvalid,
    #[error("refresh token reuse detected, sign in again")]
    TokenReuseDetected,
    #[error("email verification is unavailable, try again later")]
    DependencyUnavailable,
    #[error("{0}")]
    Validation(String),
    #[error("something went wrong")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::OAuthOnlyAccount => "OAUTH_ONLY_ACCOUNT",
            Self::InvalidCode => "INVALID_CODE",
            Self::NotEnabled => "NOT_ENABLED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::TokenReuseDetected => "TOKEN_REUSE_DETECTED",
            Self::DependencyUnavailable => "DEPENDENCY_UNAVAILABLE",
            Self::Validation(_) => "VALIDATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::AlreadyExists
            | Self::NotFound
            | Self::PasswordMismatch
            | Self::OAuthOnlyAccount
            | Self::InvalidCode
            | Self::NotEnabled => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::TokenReuseDetected => StatusCode::CONFLICT,
            Self::DependencyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            tracing::error!(error = ?source, "internal error");
        }

        let body = Json(json!({
            "code": self.code(),
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::TokenExpired,
            TokenError::Invalid => Self::TokenInvalid,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::internal(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
