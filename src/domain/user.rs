//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::RoleName;

/// User domain entity.
///
/// `password_hash` is `None` for external-identity users that never set a
/// local credential; those accounts cannot pass phase-1 login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub name: String,
    /// Deactivated users are rejected at authentication regardless of
    /// credential validity.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(id: Uuid, email: String, password_hash: Option<String>, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "estudiante@sion.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Juan Pérez")]
    pub name: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Role names held by the user (informational snapshot)
    #[schema(example = json!(["ESTUDIANTE"]))]
    pub roles: Vec<RoleName>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    /// Build a response from a user and their resolved roles.
    pub fn from_user(user: User, roles: Vec<RoleName>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_active: user.is_active,
            roles,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from_user(user, Vec::new())
    }
}
