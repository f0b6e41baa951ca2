//! Details reads, profile updates, and the privileged role change.

mod common;

use common::{sign_up, store, token_config};
use tradepost::modules::auth::service::AuthService;
use tradepost::modules::users::model::{
    AdminProfile, CustomerProfile, RoleProfile, StaffProfile, UserRole,
};
use tradepost::modules::users::service::UserService;
use tradepost::store::CredentialStore;
use tradepost::utils::errors::AppError;

fn customer_profile(first: &str, last: &str) -> RoleProfile {
    RoleProfile::Customer(CustomerProfile {
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone_number: None,
        address: None,
        city: None,
        state: None,
        country: None,
        postal_code: None,
    })
}

#[tokio::test]
async fn test_self_details_without_profile() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(&store, &config, "alice@example.com", "Abc12345!", None).await;

    let response = UserService::get_self_details(&store, user.id).await.unwrap();
    assert_eq!(response.user.email, "alice@example.com");
    assert!(response.details.is_none());
}

#[tokio::test]
async fn test_update_and_read_own_profile() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(&store, &config, "alice@example.com", "Abc12345!", None).await;

    let profile = customer_profile("Alice", "Doe");
    UserService::update_details(&store, user.id, UserRole::Customer, profile.clone())
        .await
        .unwrap();

    let response = UserService::get_self_details(&store, user.id).await.unwrap();
    assert_eq!(response.details, Some(profile));
}

#[tokio::test]
async fn test_update_details_rejects_mismatched_payload_role() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(&store, &config, "alice@example.com", "Abc12345!", None).await;

    let staff_payload = RoleProfile::Staff(StaffProfile {
        first_name: "Alice".to_string(),
        last_name: "Doe".to_string(),
        salary: Some(1.0),
    });

    let err = UserService::update_details(&store, user.id, UserRole::Customer, staff_payload)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_update_details_with_stale_token_role_clears_session() {
    let store = store();
    let config = token_config();
    let (user, tokens) = sign_up(&store, &config, "alice@example.com", "Abc12345!", None).await;

    // The role changed after the caller's token was minted.
    store.set_role(user.id, UserRole::Staff).await.unwrap();

    let err = UserService::update_details(
        &store,
        user.id,
        UserRole::Customer,
        customer_profile("Alice", "Doe"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // The session was forcibly closed.
    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.refresh_token.is_empty());
    assert_ne!(stored.refresh_token, tokens.refresh_token);
}

#[tokio::test]
async fn test_details_read_policy() {
    let store = store();
    let config = token_config();
    let (customer, _) = sign_up(&store, &config, "c@example.com", "Abc12345!", None).await;
    let (staff, _) = sign_up(
        &store,
        &config,
        "s@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;
    let (admin, _) = sign_up(
        &store,
        &config,
        "a@example.com",
        "Abc12345!",
        Some(UserRole::Admin),
    )
    .await;

    // Staff may read customers only.
    assert!(UserService::get_details(&store, UserRole::Staff, customer.id).await.is_ok());
    assert!(matches!(
        UserService::get_details(&store, UserRole::Staff, staff.id).await.unwrap_err(),
        AppError::Forbidden(_)
    ));
    assert!(matches!(
        UserService::get_details(&store, UserRole::Staff, admin.id).await.unwrap_err(),
        AppError::Forbidden(_)
    ));

    // Customers may read no one.
    assert!(matches!(
        UserService::get_details(&store, UserRole::Customer, customer.id).await.unwrap_err(),
        AppError::Forbidden(_)
    ));

    // Admins may read anyone.
    assert!(UserService::get_details(&store, UserRole::Admin, customer.id).await.is_ok());
    assert!(UserService::get_details(&store, UserRole::Admin, staff.id).await.is_ok());
    assert!(UserService::get_details(&store, UserRole::Admin, admin.id).await.is_ok());
}

#[tokio::test]
async fn test_get_details_unknown_target() {
    let store = store();

    let err = UserService::get_details(&store, UserRole::Admin, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_update_role_forces_reauthentication_and_drops_state() {
    let store = store();
    let config = token_config();
    let (user, tokens) = sign_up(
        &store,
        &config,
        "s@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;

    // Staff user with a profile and an enrolled second factor.
    let profile = RoleProfile::Staff(StaffProfile {
        first_name: "Sam".to_string(),
        last_name: "Gee".to_string(),
        salary: None,
    });
    UserService::update_details(&store, user.id, UserRole::Staff, profile)
        .await
        .unwrap();
    tradepost::modules::mfa::service::MfaService::enroll(&store, user.id)
        .await
        .unwrap();

    UserService::update_role(&store, user.id, UserRole::Admin)
        .await
        .unwrap();

    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.role, UserRole::Admin);
    // Session cleared: the old refresh token is dead.
    assert!(stored.refresh_token.is_empty());
    let err = AuthService::refresh(&store, &config, user.id, &tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TokenReuseDetected));
    // Second-factor state never carries across a role change.
    assert!(!stored.mfa_enabled);
    assert!(stored.mfa_secret.is_empty());
    // The old role's profile is gone until new data is supplied.
    assert!(store.find_role_profile(user.id).await.unwrap().is_none());

    // Supplying an admin profile afterwards works.
    UserService::update_details(
        &store,
        user.id,
        UserRole::Admin,
        RoleProfile::Admin(AdminProfile {
            first_name: "Sam".to_string(),
            last_name: "Gee".to_string(),
        }),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_update_role_unknown_user() {
    let store = store();

    let err = UserService::update_role(&store, uuid::Uuid::new_v4(), UserRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}
