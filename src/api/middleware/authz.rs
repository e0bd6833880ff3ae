//! Authorization gate middleware.
//!
//! One OR-combined gate guards every protected route: the request passes
//! if the caller holds any of the listed roles, or any of the listed
//! permissions. The role check uses the roles the authentication
//! middleware already attached; only when it misses does the gate pay for
//! a live permission lookup. No caching, so a revoked grant stops working
//! on the next request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::CurrentUser;
use crate::api::AppState;
use crate::domain::RoleName;
use crate::errors::AppError;
use crate::services::RbacService;

/// Access requirements for a route group.
#[derive(Clone, Default)]
pub struct Gate {
    roles: Vec<RoleName>,
    permissions: Vec<&'static str>,
}

impl Gate {
    pub fn role(role: RoleName) -> Self {
        Self {
            roles: vec![role],
            permissions: Vec::new(),
        }
    }

    pub fn or_role(mut self, role: RoleName) -> Self {
        self.roles.push(role);
        self
    }

    pub fn or_permission(mut self, permission: &'static str) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Evaluate this gate against the current user.
    pub async fn check(&self, rbac: &dyn RbacService, user: &CurrentUser) -> Result<(), AppError> {
        if self.roles.iter().any(|r| user.has_role(*r)) {
            return Ok(());
        }

        for permission in &self.permissions {
            if rbac.has_permission(user.id, permission).await? {
                return Ok(());
            }
        }

        tracing::debug!(user_id = %user.id, "Access denied by gate");
        Err(AppError::Forbidden)
    }
}

/// Gate middleware for use with `middleware::from_fn_with_state`.
///
/// A missing `CurrentUser` means the authentication middleware did not
/// run, which is a pipeline ordering bug; it surfaces as 401, not 403.
pub async fn gate_middleware(
    State((state, gate)): State<(AppState, Gate)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    gate.check(state.rbac_service.as_ref(), user).await?;

    Ok(next.run(request).await)
}
