//! Catalog service - role and permission reference data plus seeding.
//!
//! Seeding is idempotent: every insert goes through upsert-by-unique-name,
//! so running it against an already-seeded database changes nothing.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{SEED_ADMIN_DEFAULT_PASSWORD, SEED_ADMIN_EMAIL};
use crate::domain::{
    permission_name, Password, Permission, PermissionAction, PermissionModule, Role, RoleName,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

use PermissionAction::*;
use PermissionModule::*;

/// The curated permission catalog seeded into every deployment.
const PERMISSION_CATALOG: &[(PermissionModule, PermissionAction, &str)] = &[
    (Practicas, Read, "View practice placements"),
    (Practicas, Create, "Create practice placements"),
    (Practicas, Update, "Update practice placements"),
    (Practicas, Delete, "Delete practice placements"),
    (Asignaciones, Read, "View assignments"),
    (Asignaciones, Create, "Create assignments"),
    (Asignaciones, Update, "Update assignments"),
    (Asignaciones, Manage, "Manage assignment lifecycle"),
    (Evaluaciones, Read, "View evaluations"),
    (Evaluaciones, Create, "Record evaluations"),
    (Evaluaciones, Update, "Correct evaluations"),
    (Evidencias, Read, "View practice evidence"),
    (Evidencias, Create, "Upload practice evidence"),
    (Evidencias, Delete, "Remove practice evidence"),
    (Reportes, Read, "View reports"),
    (Reportes, Export, "Export reports"),
    (Usuarios, Read, "View users"),
    (Usuarios, Create, "Create users"),
    (Usuarios, Update, "Update users"),
    (Usuarios, Manage, "Activate and deactivate users"),
    (Administracion, Manage, "Manage reference data"),
    (Administracion, Configure, "Configure system settings"),
    (Administracion, AssignRoles, "Assign roles to users"),
    (Dashboard, Read, "View the dashboard"),
];

/// Default role grants, as (role, module, action) triples.
const ROLE_GRANTS: &[(RoleName, PermissionModule, PermissionAction)] = &[
    (RoleName::Estudiante, Practicas, Read),
    (RoleName::Estudiante, Asignaciones, Read),
    (RoleName::Estudiante, Evaluaciones, Read),
    (RoleName::Estudiante, Evidencias, Read),
    (RoleName::Estudiante, Evidencias, Create),
    (RoleName::Estudiante, Dashboard, Read),
    (RoleName::PastorTutor, Practicas, Read),
    (RoleName::PastorTutor, Asignaciones, Read),
    (RoleName::PastorTutor, Evaluaciones, Read),
    (RoleName::PastorTutor, Evaluaciones, Create),
    (RoleName::PastorTutor, Evidencias, Read),
    (RoleName::PastorTutor, Dashboard, Read),
    (RoleName::Docente, Practicas, Read),
    (RoleName::Docente, Asignaciones, Read),
    (RoleName::Docente, Evaluaciones, Read),
    (RoleName::Docente, Evaluaciones, Create),
    (RoleName::Docente, Evaluaciones, Update),
    (RoleName::Docente, Evidencias, Read),
    (RoleName::Docente, Reportes, Read),
    (RoleName::Docente, Dashboard, Read),
    (RoleName::Coordinador, Practicas, Read),
    (RoleName::Coordinador, Practicas, Create),
    (RoleName::Coordinador, Practicas, Update),
    (RoleName::Coordinador, Asignaciones, Read),
    (RoleName::Coordinador, Asignaciones, Create),
    (RoleName::Coordinador, Asignaciones, Update),
    (RoleName::Coordinador, Asignaciones, Manage),
    (RoleName::Coordinador, Evaluaciones, Read),
    (RoleName::Coordinador, Reportes, Read),
    (RoleName::Coordinador, Reportes, Export),
    (RoleName::Coordinador, Usuarios, Read),
    (RoleName::Coordinador, Dashboard, Read),
    (RoleName::Decano, Practicas, Read),
    (RoleName::Decano, Asignaciones, Read),
    (RoleName::Decano, Evaluaciones, Read),
    (RoleName::Decano, Reportes, Read),
    (RoleName::Decano, Reportes, Export),
    (RoleName::Decano, Usuarios, Read),
    (RoleName::Decano, Dashboard, Read),
];

/// Catalog management operations (admin reference data).
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    async fn create_role(&self, name: RoleName, description: String) -> AppResult<Role>;

    async fn update_role(&self, id: Uuid, description: String) -> AppResult<Role>;

    /// Hard delete; user links and grants go with it
    async fn delete_role(&self, id: Uuid) -> AppResult<()>;

    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    async fn create_permission(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission>;

    async fn update_permission(&self, id: Uuid, description: String) -> AppResult<Permission>;

    /// Soft delete: the permission stops contributing to effective sets
    /// but stays visible in listings
    async fn delete_permission(&self, id: Uuid) -> AppResult<()>;

    /// Seed the role/permission catalog and the bootstrap admin account
    async fn seed(&self) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn seed_admin_user(&self) -> AppResult<()> {
        let users = self.uow.users();
        let admin = match users.find_by_email(SEED_ADMIN_EMAIL).await? {
            Some(user) => user,
            None => {
                let hash = Password::new(SEED_ADMIN_DEFAULT_PASSWORD)?.into_string();
                tracing::warn!(
                    email = SEED_ADMIN_EMAIL,
                    "Bootstrap admin created with default password, change it"
                );
                users
                    .create(
                        SEED_ADMIN_EMAIL.to_string(),
                        Some(hash),
                        "Administrador".to_string(),
                    )
                    .await?
            }
        };

        let admin_role = self
            .uow
            .roles()
            .find_by_name(RoleName::AdminTecnico)
            .await?
            .ok_or(AppError::RoleNotFound)?;

        let current = self.uow.roles().roles_for_user(admin.id).await?;
        if current.iter().any(|r| r.id == admin_role.id) {
            return Ok(());
        }

        let mut role_ids: Vec<Uuid> = current.into_iter().map(|r| r.id).collect();
        role_ids.push(admin_role.id);
        self.uow.roles().replace_user_roles(admin.id, role_ids).await
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list().await
    }

    async fn create_role(&self, name: RoleName, description: String) -> AppResult<Role> {
        self.uow.roles().create(name, description).await
    }

    async fn update_role(&self, id: Uuid, description: String) -> AppResult<Role> {
        self.uow.roles().update_description(id, description).await
    }

    async fn delete_role(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .roles()
            .find_by_id(id)
            .await?
            .ok_or(AppError::RoleNotFound)?;
        self.uow.roles().delete(id).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.uow.permissions().list().await
    }

    async fn create_permission(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission> {
        self.uow.permissions().create(module, action, description).await
    }

    async fn update_permission(&self, id: Uuid, description: String) -> AppResult<Permission> {
        self.uow
            .permissions()
            .update_description(id, description)
            .await
    }

    async fn delete_permission(&self, id: Uuid) -> AppResult<()> {
        self.uow.permissions().deactivate(id).await
    }

    async fn seed(&self) -> AppResult<()> {
        for role in RoleName::ALL {
            self.uow
                .roles()
                .upsert(role, role.description().to_string())
                .await?;
        }

        for (module, action, description) in PERMISSION_CATALOG {
            self.uow
                .permissions()
                .upsert(*module, *action, (*description).to_string())
                .await?;
        }

        for (role_name, module, action) in ROLE_GRANTS {
            let role = self
                .uow
                .roles()
                .find_by_name(*role_name)
                .await?
                .ok_or(AppError::RoleNotFound)?;
            let permission = self
                .uow
                .permissions()
                .find_by_name(&permission_name(*module, *action))
                .await?
                .ok_or(AppError::NotFound)?;
            self.uow.roles().grant_permission(role.id, permission.id).await?;
        }

        // The technical admin holds the entire catalog
        let admin_role = self
            .uow
            .roles()
            .find_by_name(RoleName::AdminTecnico)
            .await?
            .ok_or(AppError::RoleNotFound)?;
        for permission in self.uow.permissions().list().await? {
            self.uow
                .roles()
                .grant_permission(admin_role.id, permission.id)
                .await?;
        }

        self.seed_admin_user().await?;

        tracing::info!("Catalog seeded");
        Ok(())
    }
}
