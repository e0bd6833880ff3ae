//! JWT authentication middleware.
//!
//! Resolves the bearer token to a live user on every request. The token's
//! role snapshot is never trusted for access decisions; roles attached
//! here come from the database, so deactivation and role edits apply to
//! the next request.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::RoleName;
use crate::errors::AppError;

/// Authenticated user attached to request extensions.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<RoleName>,
}

impl CurrentUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }
}

/// JWT authentication middleware.
///
/// Extracts the bearer token, verifies it, re-fetches the user (missing
/// or deactivated accounts fail with 401) and injects [`CurrentUser`]
/// into the request extensions. Identity only; access decisions belong
/// to the authorization gate.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let (user, roles) = state.auth_service.authenticate(token).await?;

    let current_user = CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
        roles: roles.into_iter().map(|r| r.name).collect(),
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
