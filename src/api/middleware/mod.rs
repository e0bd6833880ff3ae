//! API middleware.

mod auth;
mod authz;

pub use auth::{auth_middleware, CurrentUser};
pub use authz::{gate_middleware, Gate};
