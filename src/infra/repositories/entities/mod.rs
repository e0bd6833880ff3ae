//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod otp_code;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_role;
