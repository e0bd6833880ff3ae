//! Two-phase login flow tests against in-memory repositories.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use practicas_api::config::Config;
use practicas_api::domain::{OtpCode, Password, RoleName};
use practicas_api::errors::AppError;
use practicas_api::infra::{RoleRepository, UnitOfWork, UserRepository};
use practicas_api::services::{AuthService, Authenticator};

use common::{CaptureMailer, FakeUow};

fn test_config() -> Config {
    Config::for_tests("test-secret-key-for-testing-only-32chars")
}

fn hash(password: &str) -> Option<String> {
    Some(Password::new(password).unwrap().into_string())
}

struct Setup {
    uow: Arc<FakeUow>,
    mailer: Arc<CaptureMailer>,
    auth: Authenticator<FakeUow>,
}

fn setup() -> Setup {
    let uow = Arc::new(FakeUow::new());
    let mailer = Arc::new(CaptureMailer::new());
    let auth = Authenticator::new(uow.clone(), mailer.clone(), test_config());
    Setup { uow, mailer, auth }
}

#[tokio::test]
async fn admin_end_to_end_login() {
    let s = setup();
    let admin = s.uow.add_user("admin@sion.com", hash("admin"), true);
    let role = s.uow.add_role(RoleName::AdminTecnico);
    s.uow.link_user_role(admin.id, role.id);

    s.auth
        .login("admin@sion.com".to_string(), "admin".to_string())
        .await
        .unwrap();

    let code = s.mailer.last_code("admin@sion.com").unwrap();
    let token = s
        .auth
        .verify_otp("admin@sion.com".to_string(), code)
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");

    let (user, roles) = s.auth.authenticate(&token.access_token).await.unwrap();
    assert_eq!(user.email, "admin@sion.com");
    assert!(roles.iter().any(|r| r.name == RoleName::AdminTecnico));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let s = setup();
    s.uow.add_user("ana@sion.com", hash("secret"), true);

    let err = s
        .auth
        .login("ana@sion.com".to_string(), "not-secret".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    assert_eq!(s.mailer.sent_count(), 0);
}

#[tokio::test]
async fn unknown_email_gets_same_error_as_wrong_password() {
    let s = setup();
    s.uow.add_user("ana@sion.com", hash("secret"), true);

    let unknown = s
        .auth
        .login("nobody@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap_err();
    let wrong = s
        .auth
        .login("ana@sion.com".to_string(), "wrong".to_string())
        .await
        .unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn deactivated_account_cannot_start_login() {
    let s = setup();
    s.uow.add_user("ana@sion.com", hash("secret"), false);

    let err = s
        .auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn account_without_local_password_cannot_login() {
    let s = setup();
    s.uow.add_user("external@sion.com", None, true);

    let err = s
        .auth
        .login("external@sion.com".to_string(), "anything".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn code_is_single_use() {
    let s = setup();
    s.uow.add_user("ana@sion.com", hash("secret"), true);

    s.auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();
    let code = s.mailer.last_code("ana@sion.com").unwrap();

    s.auth
        .verify_otp("ana@sion.com".to_string(), code.clone())
        .await
        .unwrap();

    let err = s
        .auth
        .verify_otp("ana@sion.com".to_string(), code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidOtp));
}

#[tokio::test]
async fn expired_code_is_rejected() {
    let s = setup();
    let user = s.uow.add_user("ana@sion.com", hash("secret"), true);

    let mut otp = OtpCode::issue(user.email.clone(), 15);
    otp.expires_at = Utc::now() - Duration::minutes(1);
    let code = otp.code.clone();
    s.uow.state.otps.lock().unwrap().push(otp);

    let err = s
        .auth
        .verify_otp("ana@sion.com".to_string(), code)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OtpExpired));
}

#[tokio::test]
async fn second_login_supersedes_first_code() {
    let s = setup();
    s.uow.add_user("ana@sion.com", hash("secret"), true);

    s.auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();
    let first = s.mailer.last_code("ana@sion.com").unwrap();

    s.auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();
    let second = s.mailer.last_code("ana@sion.com").unwrap();

    // Only the latest code can still pass verification
    if first != second {
        let err = s
            .auth
            .verify_otp("ana@sion.com".to_string(), first)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidOtp));
    }
    s.auth
        .verify_otp("ana@sion.com".to_string(), second)
        .await
        .unwrap();
}

#[tokio::test]
async fn wrong_code_is_rejected() {
    let s = setup();
    s.uow.add_user("ana@sion.com", hash("secret"), true);

    s.auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();

    let err = s
        .auth
        .verify_otp("ana@sion.com".to_string(), "000000".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidOtp | AppError::OtpExpired));
}

#[tokio::test]
async fn token_stops_working_after_deactivation() {
    let s = setup();
    let user = s.uow.add_user("ana@sion.com", hash("secret"), true);

    s.auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();
    let code = s.mailer.last_code("ana@sion.com").unwrap();
    let token = s
        .auth
        .verify_otp("ana@sion.com".to_string(), code)
        .await
        .unwrap();

    s.auth.authenticate(&token.access_token).await.unwrap();

    s.uow.users().set_active(user.id, false).await.unwrap();

    let err = s.auth.authenticate(&token.access_token).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn login_dispatches_exactly_one_six_digit_code() {
    use practicas_api::jobs::MockMailer;

    let uow = Arc::new(FakeUow::new());
    uow.add_user("ana@sion.com", hash("secret"), true);

    let mut mailer = MockMailer::new();
    mailer
        .expect_send_login_code()
        .withf(|email, code, ttl| {
            email == "ana@sion.com" && code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) && *ttl > 0
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let auth = Authenticator::new(uow, Arc::new(mailer), test_config());
    auth.login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let s = setup();
    let err = s.auth.authenticate("not.a.jwt").await.unwrap_err();
    assert!(matches!(err, AppError::Jwt(_)));
}

#[tokio::test]
async fn authenticate_uses_fresh_roles_not_token_snapshot() {
    let s = setup();
    let user = s.uow.add_user("ana@sion.com", hash("secret"), true);
    let student = s.uow.add_role(RoleName::Estudiante);
    let docente = s.uow.add_role(RoleName::Docente);
    s.uow.link_user_role(user.id, student.id);

    s.auth
        .login("ana@sion.com".to_string(), "secret".to_string())
        .await
        .unwrap();
    let code = s.mailer.last_code("ana@sion.com").unwrap();
    let token = s
        .auth
        .verify_otp("ana@sion.com".to_string(), code)
        .await
        .unwrap();

    // Role change after issuance is visible on the next request
    s.uow
        .roles()
        .replace_user_roles(user.id, vec![docente.id])
        .await
        .unwrap();

    let (_, roles) = s.auth.authenticate(&token.access_token).await.unwrap();
    let names: Vec<RoleName> = roles.iter().map(|r| r.name).collect();
    assert_eq!(names, vec![RoleName::Docente]);
}
