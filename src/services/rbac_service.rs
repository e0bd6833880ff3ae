//! RBAC service - role and permission resolution for users.
//!
//! All answers come from live database state. Role assignment is a full
//! replace of the user's role set and is all-or-nothing: one unknown
//! role ID rejects the whole request.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Permission, Role, RoleName};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// RBAC resolution and assignment operations.
#[async_trait]
pub trait RbacService: Send + Sync {
    /// Roles currently assigned to the user through active links
    async fn get_user_roles(&self, user_id: Uuid) -> AppResult<Vec<Role>>;

    /// Effective permissions: union over active roles, deduplicated.
    /// A user with roles but no permission grants gets an empty list,
    /// not an error.
    async fn get_user_permissions(&self, user_id: Uuid) -> AppResult<Vec<Permission>>;

    /// Whether the user currently holds the role
    async fn has_role(&self, user_id: Uuid, role: RoleName) -> AppResult<bool>;

    /// Whether the user currently holds the named permission
    async fn has_permission(&self, user_id: Uuid, permission: &str) -> AppResult<bool>;

    /// Replace the user's role set with exactly `role_ids`
    async fn assign_roles(&self, user_id: Uuid, role_ids: Vec<Uuid>) -> AppResult<Vec<Role>>;

    /// Activate or deactivate an account
    async fn set_user_active(&self, user_id: Uuid, active: bool) -> AppResult<()>;
}

/// Concrete implementation of RbacService using Unit of Work.
pub struct RbacManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RbacManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<()> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> RbacService for RbacManager<U> {
    async fn get_user_roles(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        self.require_user(user_id).await?;
        self.uow.roles().roles_for_user(user_id).await
    }

    async fn get_user_permissions(&self, user_id: Uuid) -> AppResult<Vec<Permission>> {
        self.require_user(user_id).await?;
        self.uow.permissions().for_user(user_id).await
    }

    async fn has_role(&self, user_id: Uuid, role: RoleName) -> AppResult<bool> {
        let roles = self.get_user_roles(user_id).await?;
        Ok(roles.iter().any(|r| r.name == role))
    }

    async fn has_permission(&self, user_id: Uuid, permission: &str) -> AppResult<bool> {
        let permissions = self.get_user_permissions(user_id).await?;
        Ok(permissions.iter().any(|p| p.name == permission))
    }

    async fn assign_roles(&self, user_id: Uuid, role_ids: Vec<Uuid>) -> AppResult<Vec<Role>> {
        self.require_user(user_id).await?;

        let mut unique_ids = role_ids;
        unique_ids.sort_unstable();
        unique_ids.dedup();

        // All-or-nothing: every requested ID must name an existing role
        let roles = self.uow.roles().find_many(unique_ids.clone()).await?;
        if roles.len() != unique_ids.len() {
            return Err(AppError::RoleNotFound);
        }

        self.uow
            .roles()
            .replace_user_roles(user_id, unique_ids)
            .await?;

        tracing::info!(
            user_id = %user_id,
            roles = ?roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "User roles replaced"
        );
        Ok(roles)
    }

    async fn set_user_active(&self, user_id: Uuid, active: bool) -> AppResult<()> {
        self.uow.users().set_active(user_id, active).await?;
        tracing::info!(user_id = %user_id, active, "User active flag updated");
        Ok(())
    }
}
