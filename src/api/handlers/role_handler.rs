//! Role catalog handlers.

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
use crate::domain::{Role, RoleName};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Role creation request. The name must be one of the canonical role
/// names; unknown spellings are rejected at deserialization.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[schema(example = "DOCENTE")]
    pub name: RoleName,
    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Teacher evaluating practice work")]
    pub description: String,
}

/// Role description update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Role catalog routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", put(update_role))
        .route("/:id", delete(delete_role))
}

/// List all roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All roles", body = [Role]))
)]
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    let roles = state.catalog_service.list_roles().await?;
    Ok(Json(roles))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/roles",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 409, description = "Role already exists")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRoleRequest>,
) -> AppResult<Created<Role>> {
    let role = state
        .catalog_service
        .create_role(payload.name, payload.description)
        .await?;
    Ok(Created(role))
}

/// Update a role's description
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<Json<Role>> {
    let role = state
        .catalog_service
        .update_role(id, payload.description)
        .await?;
    Ok(Json(role))
}

/// Delete a role and its links
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_role(id).await?;
    Ok(NoContent)
}
