//! Authentication request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::modules::users::model::UserView;

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Passwords must be 8-20 characters and mix lower case, upper case, a digit,
/// and one of `@$!%*?&`.
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    let len_ok = (8..=20).contains(&password.chars().count());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));

    if len_ok && has_lower && has_upper && has_digit && has_special && allowed {
        Ok(())
    } else {
        Err(ValidationError::new("password_complexity")
            .with_message("try a more complex password".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = validate_password_complexity))]
    #[schema(example = "Abc12345!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of a primary-credential check.
///
/// Staff and admin accounts with a second factor enrolled never get session
/// tokens straight from the password check; they get a short-lived MFA
/// session token and must complete the code verification first.
#[derive(Debug)]
pub enum SignInOutcome {
    Authenticated(SessionTokens),
    SecondFactorRequired { mfa_session_token: String },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserView,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Returned instead of [`LoginResponse`] when the second factor is pending.
#[derive(Debug, Serialize, ToSchema)]
pub struct MfaRequiredResponse {
    pub mfa_required: bool,
    pub mfa_session_token: String,
}

/// Refresh/logout accept the token from the `refresh_token` cookie or,
/// failing that, from the request body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// An externally verified federated identity.
///
/// The provider exchange and email verification happen upstream; by the time
/// this struct exists the email is trusted.
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedIdentity {
    pub email: String,
    pub provider_id: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
