//! Permission repository: permission reference data and effective-permission
//! resolution.
//!
//! `for_user` flattens user → active role links → active role-permission
//! links → active permissions, deduplicated by permission identity.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{
    permission::{self, Entity as PermissionEntity},
    role_permission::{self, Entity as RolePermissionEntity},
    user_role::{self, Entity as UserRoleEntity},
};
use crate::domain::{permission_name, Permission, PermissionAction, PermissionModule};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Permission persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Find permission by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>>;

    /// Find permission by unique name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// List all permissions (active and inactive)
    async fn list(&self) -> AppResult<Vec<Permission>>;

    /// Create a new permission
    async fn create(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission>;

    /// Update a permission's description
    async fn update_description(&self, id: Uuid, description: String) -> AppResult<Permission>;

    /// Soft-delete: mark inactive so it stops contributing to effective sets
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;

    /// Insert-or-update by unique name (idempotent seeding); reactivates a
    /// previously deactivated permission
    async fn upsert(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission>;

    /// Effective permissions of a user, deduplicated
    async fn for_user(&self, user_id: Uuid) -> AppResult<Vec<Permission>>;
}

/// SeaORM-backed permission store.
pub struct PermissionStore {
    db: DatabaseConnection,
}

impl PermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_permissions(models: Vec<permission::Model>) -> AppResult<Vec<Permission>> {
    models.into_iter().map(Permission::try_from).collect()
}

#[async_trait]
impl PermissionRepository for PermissionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        let result = PermissionEntity::find_by_id(id).one(&self.db).await?;
        result.map(Permission::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let result = PermissionEntity::find()
            .filter(permission::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        result.map(Permission::try_from).transpose()
    }

    async fn list(&self) -> AppResult<Vec<Permission>> {
        let models = PermissionEntity::find()
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await?;
        to_permissions(models)
    }

    async fn create(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission> {
        let name = permission_name(module, action);
        if self.find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Permission"));
        }

        let now = Utc::now();
        let model = permission::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            module: Set(module.as_str().to_string()),
            action: Set(action.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Permission::try_from(model)
    }

    async fn update_description(&self, id: Uuid, description: String) -> AppResult<Permission> {
        let model = PermissionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: permission::ActiveModel = model.into();
        active.description = Set(description);
        active.updated_at = Set(Utc::now());

        Permission::try_from(active.update(&self.db).await?)
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let model = PermissionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: permission::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn upsert(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission> {
        let name = permission_name(module, action);
        match PermissionEntity::find()
            .filter(permission::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?
        {
            Some(model) => {
                let mut active: permission::ActiveModel = model.into();
                active.description = Set(description);
                active.is_active = Set(true);
                active.updated_at = Set(Utc::now());
                Permission::try_from(active.update(&self.db).await?)
            }
            None => self.create(module, action, description).await,
        }
    }

    async fn for_user(&self, user_id: Uuid) -> AppResult<Vec<Permission>> {
        // Three narrow queries instead of one wide join: active links only
        // at each hop, which also makes the active-flag semantics explicit.
        let role_ids: Vec<Uuid> = UserRoleEntity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::IsActive.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.role_id)
            .collect();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut permission_ids: Vec<Uuid> = RolePermissionEntity::find()
            .filter(role_permission::Column::RoleId.is_in(role_ids))
            .filter(role_permission::Column::IsActive.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.permission_id)
            .collect();

        // Dedup: the same permission through two roles appears once.
        permission_ids.sort_unstable();
        permission_ids.dedup();

        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = PermissionEntity::find()
            .filter(permission::Column::Id.is_in(permission_ids))
            .filter(permission::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;
        to_permissions(models)
    }
}
