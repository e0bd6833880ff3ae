//! Service Container - Centralized service access.
//!
//! Depends on service traits, not implementations, so handlers and
//! middleware stay mockable.

use std::sync::Arc;

use super::{AuthService, CatalogService, PracticeService, RbacService, UserService};
use crate::config::Config;
use crate::infra::{InMemoryAssignments, InMemoryEvaluations, InMemoryTransfers, Persistence};
use crate::jobs::Mailer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get RBAC service
    fn rbac(&self) -> Arc<dyn RbacService>;

    /// Get catalog service
    fn catalog(&self) -> Arc<dyn CatalogService>;

    /// Get practice placement service
    fn practice(&self) -> Arc<dyn PracticeService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    rbac_service: Arc<dyn RbacService>,
    catalog_service: Arc<dyn CatalogService>,
    practice_service: Arc<dyn PracticeService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        rbac_service: Arc<dyn RbacService>,
        catalog_service: Arc<dyn CatalogService>,
        practice_service: Arc<dyn PracticeService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            rbac_service,
            catalog_service,
            practice_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        config: Config,
    ) -> Self {
        use super::{Authenticator, CatalogManager, PracticeManager, RbacManager, UserManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), mailer, config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let rbac_service = Arc::new(RbacManager::new(uow.clone()));
        let catalog_service = Arc::new(CatalogManager::new(uow));
        let practice_service = Arc::new(PracticeManager::new(
            Arc::new(InMemoryAssignments::new()),
            Arc::new(InMemoryEvaluations::new()),
            Arc::new(InMemoryTransfers::new()),
        ));

        Self {
            auth_service,
            user_service,
            rbac_service,
            catalog_service,
            practice_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn rbac(&self) -> Arc<dyn RbacService> {
        self.rbac_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn practice(&self) -> Arc<dyn PracticeService> {
        self.practice_service.clone()
    }
}
