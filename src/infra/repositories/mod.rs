//! Repository layer
//!
//! Repository traits define the persistence seam; SeaORM stores back the
//! identity tables, while the placement workflow uses in-memory stores.

pub mod entities;
pub mod otp_repository;
pub mod permission_repository;
pub mod practice;
pub mod role_repository;
pub mod user_repository;

pub use otp_repository::{OtpRepository, OtpStore};
pub use permission_repository::{PermissionRepository, PermissionStore};
pub use practice::{
    AssignmentRepository, EvaluationRepository, InMemoryAssignments, InMemoryEvaluations,
    InMemoryTransfers, TransferRepository,
};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use otp_repository::MockOtpRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use permission_repository::MockPermissionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use practice::{MockAssignmentRepository, MockEvaluationRepository, MockTransferRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
