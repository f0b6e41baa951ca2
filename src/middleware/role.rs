//! Role-based authorization checks.
//!
//! Two styles, matching how routes are protected:
//! 1. Router-level middleware (`require_admin`) for whole route groups
//! 2. Helper functions for checks inside handlers and services

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn check_role(auth_user: &AuthUser, required: UserRole) -> Result<(), AppError> {
    if auth_user.role() != required {
        return Err(AppError::forbidden(format!(
            "this action requires the {} role",
            required.as_str()
        )));
    }
    Ok(())
}

pub fn check_any_role(auth_user: &AuthUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if !allowed.contains(&auth_user.role()) {
        return Err(AppError::forbidden(
            "you are not authorized to perform this action",
        ));
    }
    Ok(())
}

/// Policy for reading another user's details: customers and suppliers may
/// never, staff may read customers only, admins may read anyone.
pub fn check_details_access(caller: UserRole, target: UserRole) -> Result<(), AppError> {
    match caller {
        UserRole::Admin => Ok(()),
        UserRole::Staff if target == UserRole::Customer => Ok(()),
        _ => Err(AppError::forbidden(
            "you are not authorized to view this user's details",
        )),
    }
}

/// Router-level guard for admin-only route groups.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = check_role(&auth_user, UserRole::Admin) {
        return err.into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}
