use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, MessageResponse, MfaRequiredResponse, RefreshRequest,
    RegisterRequest, RegisterResponse, SessionTokens,
};
use crate::modules::mfa::model::{EnrollMfaResponse, MfaStatusResponse, VerifyMfaRequest};
use crate::modules::users::model::{
    AdminProfile, CustomerProfile, RoleProfile, StaffProfile, SupplierProfile, UpdateRoleRequest,
    UserDetailsResponse, UserRole, UserView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::logout,
        crate::modules::mfa::controller::status,
        crate::modules::mfa::controller::enroll,
        crate::modules::mfa::controller::verify,
        crate::modules::mfa::controller::disable,
        crate::modules::users::controller::get_self_details,
        crate::modules::users::controller::update_details,
        crate::modules::users::controller::get_details,
        crate::modules::users::controller::update_role,
    ),
    components(
        schemas(
            UserRole,
            UserView,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            MfaRequiredResponse,
            RefreshRequest,
            SessionTokens,
            MessageResponse,
            EnrollMfaResponse,
            VerifyMfaRequest,
            MfaStatusResponse,
            RoleProfile,
            CustomerProfile,
            StaffProfile,
            AdminProfile,
            SupplierProfile,
            UpdateRoleRequest,
            UserDetailsResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in, token rotation, logout"),
        (name = "MFA", description = "Second-factor enrollment and verification"),
        (name = "Users", description = "Account details and role management"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
