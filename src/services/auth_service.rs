//! Authentication service - two-phase login and token verification.
//!
//! Phase one checks the password and issues a one-time code by email.
//! Phase two exchanges the code for a JWT. Token verification always
//! re-fetches the user so deactivation and role changes apply to the
//! next request, not the next login.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{OtpCode, Password, Role, User, DUMMY_HASH};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::jobs::Mailer;

/// JWT claims payload.
///
/// `roles` is a snapshot at issue time, useful for display; authorization
/// decisions are always made against freshly loaded roles.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful code verification
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Phase one: check credentials and send a one-time code by email.
    /// Succeeds silently from the client's perspective; the code travels
    /// out of band.
    async fn login(&self, email: String, password: String) -> AppResult<()>;

    /// Phase two: exchange email + code for a JWT.
    async fn verify_otp(&self, email: String, code: String) -> AppResult<TokenResponse>;

    /// Resolve a bearer token into the current user and their roles.
    /// Fails if the token is invalid, or the user no longer exists or
    /// has been deactivated since issuance.
    async fn authenticate(&self, token: &str) -> AppResult<(User, Vec<Role>)>;

    /// Verify JWT signature and expiry, returning the claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, roles: &[Role], config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        roles: roles.iter().map(|r| r.name.to_string()).collect(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        Self { uow, mailer, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<()> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // SECURITY: verify against a dummy hash when the user is unknown
        // or has no local password, so response timing does not reveal
        // which emails exist.
        let password_hash = user_result
            .as_ref()
            .and_then(|u| u.password_hash.as_deref())
            .unwrap_or(DUMMY_HASH);

        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        let user = match user_result {
            Some(user) if password_valid && user.is_active => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        // Any previously issued unused code for this email is superseded
        // in the same transaction that stores the new one.
        let otp = OtpCode::issue(user.email.clone(), self.config.otp_ttl_minutes);
        let otp = self.uow.otp_codes().replace(otp).await?;

        self.mailer
            .send_login_code(&otp.email, &otp.code, self.config.otp_ttl_minutes)
            .await?;

        tracing::info!(email = %user.email, "Login code issued");
        Ok(())
    }

    async fn verify_otp(&self, email: String, code: String) -> AppResult<TokenResponse> {
        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidOtp)?;

        let otp = self
            .uow
            .otp_codes()
            .find_unused(&email, &code)
            .await?
            .ok_or(AppError::InvalidOtp)?;

        if otp.is_expired(Utc::now()) {
            return Err(AppError::OtpExpired);
        }

        // Single use: consumed before the token leaves the service
        self.uow.otp_codes().mark_used(otp.id).await?;

        let roles = self.uow.roles().roles_for_user(user.id).await?;
        generate_token(&user, &roles, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<(User, Vec<Role>)> {
        let claims = self.verify_token(token)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::Unauthorized)?;

        // Roles come from the database, not the token snapshot
        let roles = self.uow.roles().roles_for_user(user.id).await?;
        Ok((user, roles))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
