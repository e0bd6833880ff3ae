//! User account service tests.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use practicas_api::domain::Password;
use practicas_api::errors::AppError;
use practicas_api::services::{UserManager, UserService};

use common::FakeUow;

#[tokio::test]
async fn create_user_hashes_the_password() {
    let uow = Arc::new(FakeUow::new());
    let users = UserManager::new(uow.clone());

    let user = users
        .create_user(
            "ana@sion.com".to_string(),
            "secret".to_string(),
            "Ana".to_string(),
        )
        .await
        .unwrap();

    assert!(user.is_active);
    let hash = user.password_hash.unwrap();
    assert_ne!(hash, "secret");
    assert!(Password::from_hash(hash).verify("secret"));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let uow = Arc::new(FakeUow::new());
    let users = UserManager::new(uow.clone());
    uow.add_user("ana@sion.com", None, true);

    let err = users
        .create_user(
            "ana@sion.com".to_string(),
            "secret".to_string(),
            "Ana".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn too_short_password_is_rejected() {
    let uow = Arc::new(FakeUow::new());
    let users = UserManager::new(uow.clone());

    let err = users
        .create_user(
            "ana@sion.com".to_string(),
            "abc".to_string(),
            "Ana".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(users.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_user_distinguishes_missing_from_deactivated() {
    let uow = Arc::new(FakeUow::new());
    let users = UserManager::new(uow.clone());
    let inactive = uow.add_user("ana@sion.com", None, false);

    // Deactivated accounts remain visible to administrators
    let found = users.get_user(inactive.id).await.unwrap();
    assert!(!found.is_active);

    let err = users.get_user(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}

#[tokio::test]
async fn list_includes_deactivated_accounts() {
    let uow = Arc::new(FakeUow::new());
    let users = UserManager::new(uow.clone());
    uow.add_user("a@sion.com", None, true);
    uow.add_user("b@sion.com", None, false);

    assert_eq!(users.list_users().await.unwrap().len(), 2);
}
