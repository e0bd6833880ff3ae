//! Shared in-memory test doubles for the identity repositories.
//!
//! These implement the same traits as the SeaORM stores, so service-level
//! tests run against real service code without a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use practicas_api::domain::{
    permission_name, OtpCode, Permission, PermissionAction, PermissionModule, Role, RoleName, User,
};
use practicas_api::errors::{AppError, AppResult};
use practicas_api::infra::{
    OtpRepository, PermissionRepository, RoleRepository, UnitOfWork, UserRepository,
};
use practicas_api::jobs::Mailer;

/// Shared backing state for all fake repositories.
#[derive(Default)]
pub struct FakeState {
    pub users: Mutex<Vec<User>>,
    pub roles: Mutex<Vec<Role>>,
    pub permissions: Mutex<Vec<Permission>>,
    /// (user_id, role_id) active links
    pub user_roles: Mutex<Vec<(Uuid, Uuid)>>,
    /// (role_id, permission_id) active links
    pub role_permissions: Mutex<Vec<(Uuid, Uuid)>>,
    pub otps: Mutex<Vec<OtpCode>>,
}

/// Unit of Work over the shared fake state.
#[derive(Default)]
pub struct FakeUow {
    pub state: Arc<FakeState>,
}

impl FakeUow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with a hashed password and return it.
    pub fn add_user(&self, email: &str, password_hash: Option<String>, active: bool) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            name: "Test User".to_string(),
            is_active: active,
            created_at: now,
            updated_at: now,
        };
        self.state.users.lock().unwrap().push(user.clone());
        user
    }

    /// Insert a role and return it.
    pub fn add_role(&self, name: RoleName) -> Role {
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name,
            description: name.description().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state.roles.lock().unwrap().push(role.clone());
        role
    }

    /// Insert a permission and return it.
    pub fn add_permission(&self, module: PermissionModule, action: PermissionAction) -> Permission {
        let now = Utc::now();
        let permission = Permission {
            id: Uuid::new_v4(),
            name: permission_name(module, action),
            description: String::new(),
            module,
            action,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.state
            .permissions
            .lock()
            .unwrap()
            .push(permission.clone());
        permission
    }

    pub fn link_user_role(&self, user_id: Uuid, role_id: Uuid) {
        self.state.user_roles.lock().unwrap().push((user_id, role_id));
    }

    pub fn link_role_permission(&self, role_id: Uuid, permission_id: Uuid) {
        self.state
            .role_permissions
            .lock()
            .unwrap()
            .push((role_id, permission_id));
    }
}

impl UnitOfWork for FakeUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(FakeUsers(self.state.clone()))
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        Arc::new(FakeRoles(self.state.clone()))
    }

    fn permissions(&self) -> Arc<dyn PermissionRepository> {
        Arc::new(FakePermissions(self.state.clone()))
    }

    fn otp_codes(&self) -> Arc<dyn OtpRepository> {
        Arc::new(FakeOtps(self.state.clone()))
    }
}

pub struct FakeUsers(Arc<FakeState>);

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(
        &self,
        email: String,
        password_hash: Option<String>,
        name: String,
    ) -> AppResult<User> {
        let user = User::new(Uuid::new_v4(), email, password_hash, name);
        self.0.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.0.users.lock().unwrap().clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<User> {
        let mut users = self.0.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        user.is_active = active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

pub struct FakeRoles(Arc<FakeState>);

#[async_trait]
impl RoleRepository for FakeRoles {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.0.roles.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name(&self, name: RoleName) -> AppResult<Option<Role>> {
        Ok(self
            .0
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Role>> {
        Ok(self
            .0
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        Ok(self.0.roles.lock().unwrap().clone())
    }

    async fn create(&self, name: RoleName, description: String) -> AppResult<Role> {
        let mut roles = self.0.roles.lock().unwrap();
        if roles.iter().any(|r| r.name == name) {
            return Err(AppError::conflict("Role"));
        }
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        };
        roles.push(role.clone());
        Ok(role)
    }

    async fn update_description(&self, id: Uuid, description: String) -> AppResult<Role> {
        let mut roles = self.0.roles.lock().unwrap();
        let role = roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::RoleNotFound)?;
        role.description = description;
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0.roles.lock().unwrap().retain(|r| r.id != id);
        self.0.user_roles.lock().unwrap().retain(|(_, rid)| *rid != id);
        self.0
            .role_permissions
            .lock()
            .unwrap()
            .retain(|(rid, _)| *rid != id);
        Ok(())
    }

    async fn upsert(&self, name: RoleName, description: String) -> AppResult<Role> {
        if let Some(existing) = self.find_by_name(name).await? {
            return self.update_description(existing.id, description).await;
        }
        self.create(name, description).await
    }

    async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        let role_ids: Vec<Uuid> = self
            .0
            .user_roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, rid)| *rid)
            .collect();
        self.find_many(role_ids).await
    }

    async fn replace_user_roles(&self, user_id: Uuid, role_ids: Vec<Uuid>) -> AppResult<()> {
        let mut links = self.0.user_roles.lock().unwrap();
        links.retain(|(uid, _)| *uid != user_id);
        links.extend(role_ids.into_iter().map(|rid| (user_id, rid)));
        Ok(())
    }

    async fn grant_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<()> {
        let mut links = self.0.role_permissions.lock().unwrap();
        if !links.contains(&(role_id, permission_id)) {
            links.push((role_id, permission_id));
        }
        Ok(())
    }
}

pub struct FakePermissions(Arc<FakeState>);

#[async_trait]
impl PermissionRepository for FakePermissions {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        Ok(self
            .0
            .permissions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .0
            .permissions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Permission>> {
        Ok(self.0.permissions.lock().unwrap().clone())
    }

    async fn create(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission> {
        let name = permission_name(module, action);
        let mut permissions = self.0.permissions.lock().unwrap();
        if permissions.iter().any(|p| p.name == name) {
            return Err(AppError::conflict("Permission"));
        }
        let now = Utc::now();
        let permission = Permission {
            id: Uuid::new_v4(),
            name,
            description,
            module,
            action,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        permissions.push(permission.clone());
        Ok(permission)
    }

    async fn update_description(&self, id: Uuid, description: String) -> AppResult<Permission> {
        let mut permissions = self.0.permissions.lock().unwrap();
        let permission = permissions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        permission.description = description;
        permission.updated_at = Utc::now();
        Ok(permission.clone())
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let mut permissions = self.0.permissions.lock().unwrap();
        let permission = permissions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        permission.is_active = false;
        Ok(())
    }

    async fn upsert(
        &self,
        module: PermissionModule,
        action: PermissionAction,
        description: String,
    ) -> AppResult<Permission> {
        let name = permission_name(module, action);
        if let Some(existing) = self.find_by_name(&name).await? {
            let mut permissions = self.0.permissions.lock().unwrap();
            let permission = permissions
                .iter_mut()
                .find(|p| p.id == existing.id)
                .ok_or(AppError::NotFound)?;
            permission.description = description;
            permission.is_active = true;
            return Ok(permission.clone());
        }
        self.create(module, action, description).await
    }

    async fn for_user(&self, user_id: Uuid) -> AppResult<Vec<Permission>> {
        let role_ids: Vec<Uuid> = self
            .0
            .user_roles
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, rid)| *rid)
            .collect();

        let mut permission_ids: Vec<Uuid> = self
            .0
            .role_permissions
            .lock()
            .unwrap()
            .iter()
            .filter(|(rid, _)| role_ids.contains(rid))
            .map(|(_, pid)| *pid)
            .collect();
        permission_ids.sort_unstable();
        permission_ids.dedup();

        Ok(self
            .0
            .permissions
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active && permission_ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

pub struct FakeOtps(Arc<FakeState>);

#[async_trait]
impl OtpRepository for FakeOtps {
    async fn replace(&self, otp: OtpCode) -> AppResult<OtpCode> {
        let mut otps = self.0.otps.lock().unwrap();
        otps.retain(|o| !(o.email == otp.email && !o.used));
        otps.push(otp.clone());
        Ok(otp)
    }

    async fn find_unused(&self, email: &str, code: &str) -> AppResult<Option<OtpCode>> {
        Ok(self
            .0
            .otps
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.email == email && o.code == code && !o.used)
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> AppResult<()> {
        let mut otps = self.0.otps.lock().unwrap();
        let otp = otps
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(AppError::NotFound)?;
        otp.used = true;
        Ok(())
    }
}

/// Mailer that records every dispatched code instead of sending.
#[derive(Default)]
pub struct CaptureMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl CaptureMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last code dispatched to the given address.
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for CaptureMailer {
    async fn send_login_code(&self, email: &str, code: &str, _ttl_minutes: i64) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}
