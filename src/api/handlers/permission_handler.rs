//! Permission catalog handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Permission, PermissionAction, PermissionModule};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Permission creation request. The name is derived from module and
/// action, never supplied by the client.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePermissionRequest {
    #[schema(example = "USUARIOS")]
    pub module: PermissionModule,
    #[schema(example = "read")]
    pub action: PermissionAction,
    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "View users")]
    pub description: String,
}

/// Permission description update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePermissionRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Permission catalog routes
pub fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_permissions).post(create_permission))
        .route("/:id", put(update_permission))
        .route("/:id", delete(delete_permission))
}

/// List all permissions, active and inactive
#[utoipa::path(
    get,
    path = "/permissions",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All permissions", body = [Permission]))
)]
pub async fn list_permissions(State(state): State<AppState>) -> AppResult<Json<Vec<Permission>>> {
    let permissions = state.catalog_service.list_permissions().await?;
    Ok(Json(permissions))
}

/// Create a permission
#[utoipa::path(
    post,
    path = "/permissions",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreatePermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = Permission),
        (status = 409, description = "Permission already exists")
    )
)]
pub async fn create_permission(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePermissionRequest>,
) -> AppResult<Created<Permission>> {
    let permission = state
        .catalog_service
        .create_permission(payload.module, payload.action, payload.description)
        .await?;
    Ok(Created(permission))
}

/// Update a permission's description
#[utoipa::path(
    put,
    path = "/permissions/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Permission ID")),
    request_body = UpdatePermissionRequest,
    responses(
        (status = 200, description = "Permission updated", body = Permission),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn update_permission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePermissionRequest>,
) -> AppResult<Json<Permission>> {
    let permission = state
        .catalog_service
        .update_permission(id, payload.description)
        .await?;
    Ok(Json(permission))
}

/// Soft-delete a permission (deactivate)
#[utoipa::path(
    delete,
    path = "/permissions/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 204, description = "Permission deactivated"),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn delete_permission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_permission(id).await?;
    Ok(NoContent)
}
