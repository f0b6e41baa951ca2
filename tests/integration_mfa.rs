//! Second-factor enrollment, the sign-in gate, and code verification.

mod common;

use common::{sign_in_authenticated, sign_in_mfa_pending, sign_up, store, token_config};
use tradepost::modules::auth::service::AuthService;
use tradepost::modules::mfa::service::MfaService;
use tradepost::modules::users::model::UserRole;
use tradepost::store::CredentialStore;
use tradepost::utils::errors::AppError;
use tradepost::utils::jwt::verify_mfa_session_token;
use tradepost::utils::totp::current_code;

#[tokio::test]
async fn test_customer_cannot_enroll() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(&store, &config, "alice@example.com", "Abc12345!", None).await;

    let err = MfaService::enroll(&store, user.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_supplier_cannot_enroll() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "supplier@example.com",
        "Abc12345!",
        Some(UserRole::Supplier),
    )
    .await;

    let err = MfaService::enroll(&store, user.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_enrollment_enables_immediately() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "staff@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;

    let enrollment = MfaService::enroll(&store, user.id).await.unwrap();
    assert!(!enrollment.secret.is_empty());
    assert!(enrollment.otpauth_url.starts_with("otpauth://totp/"));

    // Enabled at enrollment, before any code has been verified: the very
    // next sign-in already demands the second factor.
    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.mfa_enabled);
    assert_eq!(stored.mfa_secret, enrollment.secret);
}

#[tokio::test]
async fn test_staff_sign_in_with_mfa_yields_only_a_session_token() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "staff@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;
    MfaService::enroll(&store, user.id).await.unwrap();

    let mfa_token = sign_in_mfa_pending(&store, &config, "staff@example.com", "Abc12345!").await;

    // The challenge token names the pending account and is not an access token.
    let claims = verify_mfa_session_token(&mfa_token, &config).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert!(tradepost::utils::jwt::verify_access_token(&mfa_token, &config).is_err());
}

#[tokio::test]
async fn test_staff_without_mfa_signs_in_directly() {
    let store = store();
    let config = token_config();
    sign_up(
        &store,
        &config,
        "staff@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;

    sign_in_authenticated(&store, &config, "staff@example.com", "Abc12345!").await;
}

#[tokio::test]
async fn test_verify_wrong_code() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "staff@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;
    MfaService::enroll(&store, user.id).await.unwrap();

    let err = MfaService::verify(&store, &config, user.id, "000000")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCode));
}

#[tokio::test]
async fn test_verify_without_enrollment() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "staff@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;

    let err = MfaService::verify(&store, &config, user.id, "123456")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotEnabled));
}

#[tokio::test]
async fn test_full_second_factor_flow() {
    let store = store();
    let config = token_config();
    let (user, pre_enrollment) = sign_up(
        &store,
        &config,
        "staff@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;

    let enrollment = MfaService::enroll(&store, user.id).await.unwrap();
    sign_in_mfa_pending(&store, &config, "staff@example.com", "Abc12345!").await;

    let code = current_code(&enrollment.secret, "staff@example.com").unwrap();
    let tokens = MfaService::verify(&store, &config, user.id, &code)
        .await
        .unwrap();

    assert!(!tokens.access_token.is_empty());
    // The completed sign-in persisted a fresh fingerprint, distinct from any
    // session that existed before enrollment.
    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token, tokens.refresh_token);
    assert_ne!(stored.refresh_token, pre_enrollment.refresh_token);
}

#[tokio::test]
async fn test_disable_restores_direct_sign_in() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "admin@example.com",
        "Abc12345!",
        Some(UserRole::Admin),
    )
    .await;
    MfaService::enroll(&store, user.id).await.unwrap();

    MfaService::disable(&store, user.id).await.unwrap();

    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert!(!stored.mfa_enabled);
    assert!(stored.mfa_secret.is_empty());

    sign_in_authenticated(&store, &config, "admin@example.com", "Abc12345!").await;
}

#[tokio::test]
async fn test_customer_cannot_disable() {
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(&store, &config, "alice@example.com", "Abc12345!", None).await;

    let err = MfaService::disable(&store, user.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_scenario_staff_end_to_end() {
    // Sign up as staff, enroll, sign in again, fail with a wrong code, then
    // finish with the correct one.
    let store = store();
    let config = token_config();
    let (user, _) = sign_up(
        &store,
        &config,
        "dana@example.com",
        "Abc12345!",
        Some(UserRole::Staff),
    )
    .await;

    let err = AuthService::sign_in(&store, &config, "dana@example.com", "Nope12345!")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PasswordMismatch));

    let enrollment = MfaService::enroll(&store, user.id).await.unwrap();

    sign_in_mfa_pending(&store, &config, "dana@example.com", "Abc12345!").await;

    let err = MfaService::verify(&store, &config, user.id, "999999")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCode));

    let code = current_code(&enrollment.secret, "dana@example.com").unwrap();
    let tokens = MfaService::verify(&store, &config, user.id, &code)
        .await
        .unwrap();
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
}
