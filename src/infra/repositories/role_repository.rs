//! Role repository: role reference data plus the user-role link set.
//!
//! Role reassignment is a full replace (delete all links, insert the new
//! set) executed inside a single transaction so concurrent readers never
//! observe a partial set.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{
    role::{self, Entity as RoleEntity},
    role_permission::{self, Entity as RolePermissionEntity},
    user_role::{self, Entity as UserRoleEntity},
};
use crate::domain::{Role, RoleName};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find role by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Find role by canonical name
    async fn find_by_name(&self, name: RoleName) -> AppResult<Option<Role>>;

    /// Find the roles for the given IDs (missing IDs are simply absent
    /// from the result; callers needing all-or-nothing compare lengths).
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Role>>;

    /// List all roles
    async fn list(&self) -> AppResult<Vec<Role>>;

    /// Create a new role
    async fn create(&self, name: RoleName, description: String) -> AppResult<Role>;

    /// Update a role's description
    async fn update_description(&self, id: Uuid, description: String) -> AppResult<Role>;

    /// Delete a role and its links
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Insert-or-update by unique name (idempotent seeding)
    async fn upsert(&self, name: RoleName, description: String) -> AppResult<Role>;

    /// Roles reachable through the user's active links
    async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>>;

    /// Atomically replace the user's full role set
    async fn replace_user_roles(&self, user_id: Uuid, role_ids: Vec<Uuid>) -> AppResult<()>;

    /// Idempotently link a permission to a role (seeding)
    async fn grant_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()>;
}

fn txn_err(e: TransactionError<DbErr>) -> AppError {
    match e {
        TransactionError::Connection(e) => AppError::Database(e),
        TransactionError::Transaction(e) => AppError::Database(e),
    }
}

/// SeaORM-backed role store.
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_roles(models: Vec<role::Model>) -> AppResult<Vec<Role>> {
    models.into_iter().map(Role::try_from).collect()
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let result = RoleEntity::find_by_id(id).one(&self.db).await?;
        result.map(Role::try_from).transpose()
    }

    async fn find_by_name(&self, name: RoleName) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?;
        result.map(Role::try_from).transpose()
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .filter(role::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        to_roles(models)
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;
        to_roles(models)
    }

    async fn create(&self, name: RoleName, description: String) -> AppResult<Role> {
        if self.find_by_name(name).await?.is_some() {
            return Err(AppError::conflict("Role"));
        }

        let now = Utc::now();
        let model = role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.as_str().to_string()),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Role::try_from(model)
    }

    async fn update_description(&self, id: Uuid, description: String) -> AppResult<Role> {
        let model = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::RoleNotFound)?;

        let mut active: role::ActiveModel = model.into();
        active.description = Set(description);
        active.updated_at = Set(Utc::now());

        Role::try_from(active.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    UserRoleEntity::delete_many()
                        .filter(user_role::Column::RoleId.eq(id))
                        .exec(txn)
                        .await?;
                    RolePermissionEntity::delete_many()
                        .filter(role_permission::Column::RoleId.eq(id))
                        .exec(txn)
                        .await?;
                    RoleEntity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn upsert(&self, name: RoleName, description: String) -> AppResult<Role> {
        match self.find_by_name(name).await? {
            Some(existing) => self.update_description(existing.id, description).await,
            None => self.create(name, description).await,
        }
    }

    async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        let links = UserRoleEntity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;

        let role_ids: Vec<Uuid> = links.into_iter().map(|l| l.role_id).collect();
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(role_ids).await
    }

    async fn replace_user_roles(&self, user_id: Uuid, role_ids: Vec<Uuid>) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    UserRoleEntity::delete_many()
                        .filter(user_role::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;

                    let now = Utc::now();
                    for role_id in role_ids {
                        user_role::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            user_id: Set(user_id),
                            role_id: Set(role_id),
                            is_active: Set(true),
                            created_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn grant_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()> {
        let existing = RolePermissionEntity::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Ok(());
        }

        role_permission::ActiveModel {
            id: Set(Uuid::new_v4()),
            role_id: Set(role_id),
            permission_id: Set(permission_id),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }
}
