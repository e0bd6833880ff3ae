//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::Database;
use crate::jobs::Mailer;
use crate::services::{
    AuthService, CatalogService, PracticeService, RbacService, ServiceContainer, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// RBAC resolution service
    pub rbac_service: Arc<dyn RbacService>,
    /// Role/permission catalog service
    pub catalog_service: Arc<dyn CatalogService>,
    /// Practice placement service
    pub practice_service: Arc<dyn PracticeService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(
        database: Arc<Database>,
        mailer: Arc<dyn Mailer>,
        config: crate::config::Config,
    ) -> Self {
        let container = Arc::new(Services::from_connection(
            database.get_connection(),
            mailer,
            config,
        ));

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            rbac_service: container.rbac(),
            catalog_service: container.catalog(),
            practice_service: container.practice(),
            database,
        }
    }
}
