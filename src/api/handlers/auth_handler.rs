//! Authentication handlers - two-phase login.

use axum::{extract::State, response::Json, routing::post, Extension, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::RoleName;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// Phase-1 login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "estudiante@sion.com")]
    pub email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Phase-2 code verification request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "estudiante@sion.com")]
    pub email: String,
    /// Six-digit code received by email
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    #[schema(example = "483920")]
    pub code: String,
}

/// Resolved identity returned by the token check endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifiedUserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Freshly resolved roles, not the token snapshot
    pub roles: Vec<RoleName>,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/verify-otp", post(verify_otp))
}

/// Phase 1: check credentials and dispatch a one-time code
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Verification code sent", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Verification code sent to your email",
    )))
}

/// Phase 2: exchange the one-time code for a bearer token
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "Authentication",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired code")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyOtpRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .verify_otp(payload.email, payload.code)
        .await?;

    Ok(Json(token))
}

/// Token check: returns the resolved caller identity
#[utoipa::path(
    get,
    path = "/auth/verify",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token valid", body = VerifiedUserResponse),
        (status = 401, description = "Invalid token or deactivated account")
    )
)]
pub async fn verify(
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<VerifiedUserResponse>> {
    Ok(Json(VerifiedUserResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        roles: user.roles,
    }))
}
