//! HTTP request handlers.

pub mod auth_handler;
pub mod permission_handler;
pub mod practice_handler;
pub mod role_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use permission_handler::permission_routes;
pub use practice_handler::{
    assignment_read_routes, assignment_write_routes, evaluation_read_routes,
    evaluation_write_routes, transfer_routes,
};
pub use role_handler::role_routes;
pub use user_handler::{
    me_routes, user_assign_routes, user_create_routes, user_manage_routes, user_read_routes,
};
