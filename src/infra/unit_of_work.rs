//! Unit of Work: centralized access to the identity repositories.
//!
//! Services depend on this trait rather than on concrete stores, which
//! keeps them mockable and keeps construction wiring in one place. The
//! operations that must be atomic (code supersession, role-set replace)
//! run their transactions inside the corresponding store methods.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    OtpRepository, OtpStore, PermissionRepository, PermissionStore, RoleRepository, RoleStore,
    UserRepository, UserStore,
};

/// Repository access for the identity subsystem.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    fn permissions(&self) -> Arc<dyn PermissionRepository>;

    fn otp_codes(&self) -> Arc<dyn OtpRepository>;
}

/// Production Unit of Work backed by SeaORM stores sharing one connection
/// pool.
pub struct Persistence {
    users: Arc<UserStore>,
    roles: Arc<RoleStore>,
    permissions: Arc<PermissionStore>,
    otp_codes: Arc<OtpStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db.clone())),
            permissions: Arc::new(PermissionStore::new(db.clone())),
            otp_codes: Arc::new(OtpStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn permissions(&self) -> Arc<dyn PermissionRepository> {
        self.permissions.clone()
    }

    fn otp_codes(&self) -> Arc<dyn OtpRepository> {
        self.otp_codes.clone()
    }
}
