//! Application route configuration.
//!
//! Public routes carry no middleware. Everything else runs behind the
//! authentication middleware, with a per-group authorization gate layered
//! inside it. Gates follow the access matrix: the technical admin role
//! passes every gate, otherwise the named permission decides.

use axum::{
    extract::State, http::StatusCode, middleware, response::Json, routing::get, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    assignment_read_routes, assignment_write_routes, auth_handler, auth_routes,
    evaluation_read_routes, evaluation_write_routes, me_routes, permission_routes, role_routes,
    transfer_routes, user_assign_routes, user_create_routes, user_manage_routes, user_read_routes,
};
use super::middleware::{auth_middleware, gate_middleware, Gate};
use super::openapi::ApiDoc;
use super::AppState;
use crate::domain::RoleName;

fn admin_or(permission: &'static str) -> Gate {
    Gate::role(RoleName::AdminTecnico).or_permission(permission)
}

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let gated = |routes: Router<AppState>, gate: Gate| {
        routes.route_layer(middleware::from_fn_with_state(
            (state.clone(), gate),
            gate_middleware,
        ))
    };

    let users = me_routes()
        .merge(gated(user_read_routes(), admin_or("usuarios:read")))
        .merge(gated(user_create_routes(), admin_or("usuarios:create")))
        .merge(gated(
            user_assign_routes(),
            admin_or("administracion:assign_roles"),
        ))
        .merge(gated(user_manage_routes(), admin_or("usuarios:manage")));

    let assignments = gated(assignment_read_routes(), admin_or("asignaciones:read")).merge(gated(
        assignment_write_routes(),
        admin_or("asignaciones:create").or_permission("asignaciones:manage"),
    ));

    let evaluations = gated(evaluation_read_routes(), admin_or("evaluaciones:read")).merge(gated(
        evaluation_write_routes(),
        admin_or("evaluaciones:create"),
    ));

    let protected = Router::new()
        .route("/auth/verify", get(auth_handler::verify))
        .nest("/users", users)
        .nest("/roles", gated(role_routes(), admin_or("administracion:manage")))
        .nest(
            "/permissions",
            gated(permission_routes(), admin_or("administracion:manage")),
        )
        .nest("/assignments", assignments)
        .nest("/evaluations", evaluations)
        .nest(
            "/transfers",
            gated(transfer_routes(), admin_or("asignaciones:manage")),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Practicas API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                error: Some(e.to_string()),
            }),
        ),
    }
}
