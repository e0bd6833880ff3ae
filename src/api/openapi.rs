//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, permission_handler, practice_handler, role_handler, user_handler,
};
use crate::domain::{
    Assignment, AssignmentStatus, Evaluation, EvaluationCut, Permission, PermissionAction,
    PermissionModule, Role, RoleName, Transfer, TransferStatus, UserResponse,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the practice placement API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Practicas API",
        version = "0.1.0",
        description = "Practice placement management with role-based access control"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::verify_otp,
        auth_handler::verify,
        // User and RBAC endpoints
        user_handler::my_roles,
        user_handler::my_permissions,
        user_handler::check_my_permission,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user_roles,
        user_handler::get_user_permissions,
        user_handler::assign_roles,
        user_handler::set_active,
        // Catalog endpoints
        role_handler::list_roles,
        role_handler::create_role,
        role_handler::update_role,
        role_handler::delete_role,
        permission_handler::list_permissions,
        permission_handler::create_permission,
        permission_handler::update_permission,
        permission_handler::delete_permission,
        // Practice endpoints
        practice_handler::list_assignments,
        practice_handler::create_assignment,
        practice_handler::complete_assignment,
        practice_handler::cancel_assignment,
        practice_handler::list_evaluations,
        practice_handler::record_evaluation,
        practice_handler::list_transfers,
        practice_handler::request_transfer,
        practice_handler::resolve_transfer,
    ),
    components(
        schemas(
            // Domain types
            RoleName,
            Role,
            PermissionModule,
            PermissionAction,
            Permission,
            UserResponse,
            Assignment,
            AssignmentStatus,
            Evaluation,
            EvaluationCut,
            Transfer,
            TransferStatus,
            // Request/response types
            auth_handler::LoginRequest,
            auth_handler::VerifyOtpRequest,
            auth_handler::VerifiedUserResponse,
            TokenResponse,
            MessageResponse,
            user_handler::CreateUserRequest,
            user_handler::AssignRolesRequest,
            user_handler::SetActiveRequest,
            user_handler::PermissionCheckResponse,
            role_handler::CreateRoleRequest,
            role_handler::UpdateRoleRequest,
            permission_handler::CreatePermissionRequest,
            permission_handler::UpdatePermissionRequest,
            practice_handler::CreateAssignmentRequest,
            practice_handler::RecordEvaluationRequest,
            practice_handler::RequestTransferRequest,
            practice_handler::ResolveTransferRequest,
            practice_handler::Decision,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Two-phase login and token verification"),
        (name = "Users", description = "User administration and RBAC introspection"),
        (name = "Catalog", description = "Role and permission reference data"),
        (name = "Practice", description = "Assignments, evaluations and transfers")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/verify-otp"))
                        .build(),
                ),
            );
        }
    }
}
