//! Practice placement entities: assignments, evaluations, transfers.
//!
//! These back the illustrative CRUD services; the authorization path never
//! depends on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

/// Lifecycle of a practice assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "ACTIVE",
            AssignmentStatus::Completed => "COMPLETED",
            AssignmentStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A student placed at an institution for an academic period.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub institution: String,
    /// Academic period label, e.g. "2026-1".
    pub period: String,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Academic cut within a period; an assignment gets at most one evaluation
/// per cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationCut {
    Primero,
    Segundo,
    Tercero,
}

impl FromStr for EvaluationCut {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIMERO" => Ok(EvaluationCut::Primero),
            "SEGUNDO" => Ok(EvaluationCut::Segundo),
            "TERCERO" => Ok(EvaluationCut::Tercero),
            other => Err(AppError::validation(format!("Unknown cut: {}", other))),
        }
    }
}

/// Tutor/teacher evaluation of an assignment at a given cut.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Evaluation {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub cut: EvaluationCut,
    /// Score on a 0.0 to 5.0 scale.
    pub score: f64,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Transfer request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

/// Request to move an active assignment to another institution.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Transfer {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub to_institution: String,
    pub reason: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
