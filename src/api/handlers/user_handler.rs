//! User handlers - self-service RBAC introspection and user administration.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Permission, Role, UserResponse};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse, Paginated, PaginationParams};

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "estudiante@sion.com")]
    pub email: String,
    /// Initial password
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Juan Pérez")]
    pub name: String,
}

/// Full-replace role assignment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignRolesRequest {
    /// The complete new role set; an empty list removes all roles
    pub role_ids: Vec<Uuid>,
}

/// Activate/deactivate request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Boolean permission check result
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionCheckResponse {
    pub permission: String,
    pub allowed: bool,
}

/// Self-service routes: callers inspect their own roles and permissions
pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me/roles", get(my_roles))
        .route("/me/permissions", get(my_permissions))
        .route("/me/permissions/:name/check", get(check_my_permission))
}

/// Read-only user administration routes
pub fn user_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id/roles", get(get_user_roles))
        .route("/:id/permissions", get(get_user_permissions))
}

/// User creation route (separate gate)
pub fn user_create_routes() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}

/// Role assignment route (separate gate)
pub fn user_assign_routes() -> Router<AppState> {
    Router::new().route("/:id/roles", post(assign_roles))
}

/// Account activation route (separate gate)
pub fn user_manage_routes() -> Router<AppState> {
    Router::new().route("/:id/activate", patch(set_active))
}

/// Caller's current roles
#[utoipa::path(
    get,
    path = "/users/me/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Roles of the caller", body = [Role]))
)]
pub async fn my_roles(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Role>>> {
    let roles = state.rbac_service.get_user_roles(user.id).await?;
    Ok(Json(roles))
}

/// Caller's effective permissions
#[utoipa::path(
    get,
    path = "/users/me/permissions",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Effective permissions of the caller", body = [Permission]))
)]
pub async fn my_permissions(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state.rbac_service.get_user_permissions(user.id).await?;
    Ok(Json(permissions))
}

/// Boolean check for a single named permission
#[utoipa::path(
    get,
    path = "/users/me/permissions/{name}/check",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Permission name, e.g. usuarios:read")),
    responses((status = 200, description = "Check result", body = PermissionCheckResponse))
)]
pub async fn check_my_permission(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(name): Path<String>,
) -> AppResult<Json<PermissionCheckResponse>> {
    let allowed = state.rbac_service.has_permission(user.id, &name).await?;
    Ok(Json(PermissionCheckResponse {
        permission: name,
        allowed,
    }))
}

/// List users with their roles
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Paginated user list"))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    let page = pagination.paginate(&users);

    let mut data = Vec::with_capacity(page.data.len());
    for user in page.data {
        let roles = state.rbac_service.get_user_roles(user.id).await?;
        data.push(UserResponse::from_user(
            user,
            roles.into_iter().map(|r| r.name).collect(),
        ));
    }

    Ok(Json(Paginated {
        data,
        meta: page.meta,
    }))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .create_user(payload.email, payload.password, payload.name)
        .await?;
    Ok(Created(UserResponse::from_user(user, Vec::new())))
}

/// Roles of an arbitrary user
#[utoipa::path(
    get,
    path = "/users/{id}/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Roles of the user", body = [Role]),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Role>>> {
    let roles = state.rbac_service.get_user_roles(id).await?;
    Ok(Json(roles))
}

/// Effective permissions of an arbitrary user
#[utoipa::path(
    get,
    path = "/users/{id}/permissions",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Effective permissions", body = [Permission]),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state.rbac_service.get_user_permissions(id).await?;
    Ok(Json(permissions))
}

/// Replace a user's role set
#[utoipa::path(
    post,
    path = "/users/{id}/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AssignRolesRequest,
    responses(
        (status = 200, description = "New role set", body = [Role]),
        (status = 404, description = "User or role not found")
    )
)]
pub async fn assign_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignRolesRequest>,
) -> AppResult<Json<Vec<Role>>> {
    let roles = state.rbac_service.assign_roles(id, payload.role_ids).await?;
    Ok(Json(roles))
}

/// Activate or deactivate an account
#[utoipa::path(
    patch,
    path = "/users/{id}/activate",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Flag updated", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.rbac_service.set_user_active(id, payload.active).await?;
    let message = if payload.active {
        "User activated"
    } else {
        "User deactivated"
    };
    Ok(Json(MessageResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, name: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn create_user_request_validates() {
        assert!(request("ana@sion.com", "secret", "Ana").validate().is_ok());
        assert!(request("not-an-email", "secret", "Ana").validate().is_err());
        assert!(request("ana@sion.com", "abc", "Ana").validate().is_err());
        assert!(request("ana@sion.com", "secret", "").validate().is_err());
    }
}
