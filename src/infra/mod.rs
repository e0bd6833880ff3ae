//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories (SeaORM stores and in-memory workflow stores)
//! - Unit of Work for repository access

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AssignmentRepository, EvaluationRepository, InMemoryAssignments, InMemoryEvaluations,
    InMemoryTransfers, OtpRepository, OtpStore, PermissionRepository, PermissionStore,
    RoleRepository, RoleStore, TransferRepository, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAssignmentRepository, MockEvaluationRepository, MockOtpRepository,
    MockPermissionRepository, MockRoleRepository, MockTransferRepository, MockUserRepository,
};
