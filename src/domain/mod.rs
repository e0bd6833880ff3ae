//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod otp;
pub mod password;
pub mod practice;
pub mod role;
pub mod user;

pub use otp::OtpCode;
pub use password::{Password, DUMMY_HASH};
pub use practice::{
    Assignment, AssignmentStatus, Evaluation, EvaluationCut, Transfer, TransferStatus,
};
pub use role::{
    permission_name, Permission, PermissionAction, PermissionModule, Role, RoleName,
};
pub use user::{User, UserResponse};
