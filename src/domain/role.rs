//! Roles and permissions: the reference data authorization decisions run on.
//!
//! Role identity is the enumerated [`RoleName`], never a free string. The
//! stored `roles.name` column holds the canonical spelling produced by
//! [`RoleName::as_str`]; anything else fails conversion loudly instead of
//! silently degrading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

/// Canonical role identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Estudiante,
    PastorTutor,
    Docente,
    Coordinador,
    Decano,
    AdminTecnico,
}

impl RoleName {
    /// All roles in the seed catalog.
    pub const ALL: [RoleName; 6] = [
        RoleName::Estudiante,
        RoleName::PastorTutor,
        RoleName::Docente,
        RoleName::Coordinador,
        RoleName::Decano,
        RoleName::AdminTecnico,
    ];

    /// Canonical stored spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Estudiante => "ESTUDIANTE",
            RoleName::PastorTutor => "PASTOR_TUTOR",
            RoleName::Docente => "DOCENTE",
            RoleName::Coordinador => "COORDINADOR",
            RoleName::Decano => "DECANO",
            RoleName::AdminTecnico => "ADMIN_TECNICO",
        }
    }

    /// Human-readable description used when seeding.
    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Estudiante => "Student completing practice placements",
            RoleName::PastorTutor => "Pastor supervising students at a congregation",
            RoleName::Docente => "Teacher evaluating practice work",
            RoleName::Coordinador => "Practice coordinator for a program",
            RoleName::Decano => "Dean with faculty-wide oversight",
            RoleName::AdminTecnico => "Technical administrator with full access",
        }
    }
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ESTUDIANTE" => Ok(RoleName::Estudiante),
            "PASTOR_TUTOR" => Ok(RoleName::PastorTutor),
            "DOCENTE" => Ok(RoleName::Docente),
            "COORDINADOR" => Ok(RoleName::Coordinador),
            "DECANO" => Ok(RoleName::Decano),
            "ADMIN_TECNICO" => Ok(RoleName::AdminTecnico),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role entity: shared reference data, not owned by any user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Closed set of permission module tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionModule {
    Practicas,
    Asignaciones,
    Evaluaciones,
    Evidencias,
    Reportes,
    Usuarios,
    Administracion,
    Dashboard,
}

impl PermissionModule {
    pub const ALL: [PermissionModule; 8] = [
        PermissionModule::Practicas,
        PermissionModule::Asignaciones,
        PermissionModule::Evaluaciones,
        PermissionModule::Evidencias,
        PermissionModule::Reportes,
        PermissionModule::Usuarios,
        PermissionModule::Administracion,
        PermissionModule::Dashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionModule::Practicas => "PRACTICAS",
            PermissionModule::Asignaciones => "ASIGNACIONES",
            PermissionModule::Evaluaciones => "EVALUACIONES",
            PermissionModule::Evidencias => "EVIDENCIAS",
            PermissionModule::Reportes => "REPORTES",
            PermissionModule::Usuarios => "USUARIOS",
            PermissionModule::Administracion => "ADMINISTRACION",
            PermissionModule::Dashboard => "DASHBOARD",
        }
    }
}

impl FromStr for PermissionModule {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionModule::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| AppError::validation(format!("Unknown permission module: {}", s)))
    }
}

impl std::fmt::Display for PermissionModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of permission action tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    Read,
    Create,
    Update,
    Delete,
    Export,
    Manage,
    Configure,
    AssignRoles,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Read => "read",
            PermissionAction::Create => "create",
            PermissionAction::Update => "update",
            PermissionAction::Delete => "delete",
            PermissionAction::Export => "export",
            PermissionAction::Manage => "manage",
            PermissionAction::Configure => "configure",
            PermissionAction::AssignRoles => "assign_roles",
        }
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(PermissionAction::Read),
            "create" => Ok(PermissionAction::Create),
            "update" => Ok(PermissionAction::Update),
            "delete" => Ok(PermissionAction::Delete),
            "export" => Ok(PermissionAction::Export),
            "manage" => Ok(PermissionAction::Manage),
            "configure" => Ok(PermissionAction::Configure),
            "assign_roles" => Ok(PermissionAction::AssignRoles),
            other => Err(AppError::validation(format!(
                "Unknown permission action: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission entity. Soft-deleted via `is_active`; inactive permissions
/// never contribute to a user's effective set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    /// Unique name, conventionally `module:action` in lowercase
    /// (e.g. `asignaciones:read`).
    pub name: String,
    pub description: String,
    pub module: PermissionModule,
    pub action: PermissionAction,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical permission name for a module/action pair.
pub fn permission_name(module: PermissionModule, action: PermissionAction) -> String {
    format!("{}:{}", module.as_str().to_ascii_lowercase(), action.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for role in RoleName::ALL {
            assert_eq!(role.as_str().parse::<RoleName>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_spelling_is_rejected() {
        // The legacy dual spelling is a bug, not an alias.
        assert!("ADMINISTRADOR_TECNICO".parse::<RoleName>().is_err());
    }

    #[test]
    fn permission_names_are_lowercase_pairs() {
        assert_eq!(
            permission_name(PermissionModule::Administracion, PermissionAction::AssignRoles),
            "administracion:assign_roles"
        );
        assert_eq!(
            permission_name(PermissionModule::Usuarios, PermissionAction::Read),
            "usuarios:read"
        );
    }

    #[test]
    fn module_and_action_round_trip() {
        for m in PermissionModule::ALL {
            assert_eq!(m.as_str().parse::<PermissionModule>().unwrap(), m);
        }
        for a in [
            PermissionAction::Read,
            PermissionAction::Export,
            PermissionAction::AssignRoles,
        ] {
            assert_eq!(a.as_str().parse::<PermissionAction>().unwrap(), a);
        }
    }
}
