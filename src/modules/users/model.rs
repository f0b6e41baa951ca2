//! User data models and DTOs.
//!
//! The [`User`] entity is the single persisted identity record: credentials,
//! role, the currently-valid refresh token, and the second-factor state all
//! live here. Role-specific profile data lives in the [`RoleProfile`] tagged
//! union, one variant per role, at most one profile per user.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// The closed set of account roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Staff,
    Admin,
    Supplier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::Supplier => "supplier",
        }
    }

    /// Second-factor authentication is offered to staff and admin accounts only.
    pub fn second_factor_eligible(&self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

/// A user account as stored by the credential store.
///
/// `password_hash` is `None` for accounts created through a federated identity
/// that never set a local password. `refresh_token` holds the single
/// currently-valid refresh token, empty when no session is live. When
/// `mfa_enabled` is true, `mfa_secret` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub refresh_token: String,
    pub mfa_enabled: bool,
    pub mfa_secret: String,
}

/// The public projection of a [`User`].
///
/// This is the only user shape that leaves the service layer; it never carries
/// the password hash, the stored refresh token, or the MFA secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Role-specific profile data, tagged by role.
///
/// Changing a user's role deletes the old variant; no profile exists for the
/// new role until the user supplies one through the details update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Customer(CustomerProfile),
    Staff(StaffProfile),
    Admin(AdminProfile),
    Supplier(SupplierProfile),
}

impl RoleProfile {
    pub fn role(&self) -> UserRole {
        match self {
            Self::Customer(_) => UserRole::Customer,
            Self::Staff(_) => UserRole::Staff,
            Self::Admin(_) => UserRole::Admin,
            Self::Supplier(_) => UserRole::Supplier,
        }
    }
}

impl Validate for RoleProfile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Customer(p) => p.validate(),
            Self::Staff(p) => p.validate(),
            Self::Admin(p) => p.validate(),
            Self::Supplier(p) => p.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerProfile {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl CustomerProfile {
    /// Seed a minimal profile from a federated provider's display name.
    /// First word becomes the first name, last word the last name.
    pub fn from_display_name(display_name: &str) -> Self {
        let mut words = display_name.split_whitespace();
        let first_name = words.next().unwrap_or_default().to_string();
        let last_name = words.next_back().unwrap_or_else(|| first_name.as_str()).to_string();
        Self {
            first_name,
            last_name,
            phone_number: None,
            address: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct StaffProfile {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    pub salary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdminProfile {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SupplierProfile {
    #[validate(length(min = 1))]
    pub name: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Privileged request to change another user's role.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// A user's public view together with their role profile, if any.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDetailsResponse {
    pub user: UserView,
    pub details: Option<RoleProfile>,
}
