//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod catalog_service;
pub mod container;
mod practice_service;
mod rbac_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use catalog_service::{CatalogManager, CatalogService};
pub use practice_service::{PracticeManager, PracticeService, TransferDecision};
pub use rbac_service::{RbacManager, RbacService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
