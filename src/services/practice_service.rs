//! Practice placement service - assignments, evaluations, transfers.
//!
//! Workflow invariants live here, not in the stores: one active assignment
//! per student, one evaluation per cut, one pending transfer per
//! assignment.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Assignment, AssignmentStatus, Evaluation, EvaluationCut, Transfer, TransferStatus,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{AssignmentRepository, EvaluationRepository, TransferRepository};

/// Outcome applied when resolving a pending transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDecision {
    Approve,
    Reject,
}

/// Practice placement operations.
#[async_trait]
pub trait PracticeService: Send + Sync {
    async fn list_assignments(&self) -> AppResult<Vec<Assignment>>;

    async fn get_assignment(&self, id: Uuid) -> AppResult<Assignment>;

    /// Create an assignment; a student cannot hold two active ones
    async fn create_assignment(
        &self,
        student_id: Uuid,
        tutor_id: Uuid,
        institution: String,
        period: String,
    ) -> AppResult<Assignment>;

    async fn complete_assignment(&self, id: Uuid) -> AppResult<Assignment>;

    async fn cancel_assignment(&self, id: Uuid) -> AppResult<Assignment>;

    async fn list_evaluations(&self, assignment_id: Uuid) -> AppResult<Vec<Evaluation>>;

    /// Record an evaluation; one per (assignment, cut)
    async fn record_evaluation(
        &self,
        assignment_id: Uuid,
        cut: EvaluationCut,
        score: f64,
        comments: Option<String>,
    ) -> AppResult<Evaluation>;

    async fn list_transfers(&self) -> AppResult<Vec<Transfer>>;

    /// Request a transfer; at most one pending per assignment
    async fn request_transfer(
        &self,
        assignment_id: Uuid,
        to_institution: String,
        reason: String,
    ) -> AppResult<Transfer>;

    /// Resolve a pending transfer; approval moves the assignment
    async fn resolve_transfer(&self, id: Uuid, decision: TransferDecision)
        -> AppResult<Transfer>;
}

/// Concrete implementation over injected repositories.
pub struct PracticeManager {
    assignments: Arc<dyn AssignmentRepository>,
    evaluations: Arc<dyn EvaluationRepository>,
    transfers: Arc<dyn TransferRepository>,
}

impl PracticeManager {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        evaluations: Arc<dyn EvaluationRepository>,
        transfers: Arc<dyn TransferRepository>,
    ) -> Self {
        Self {
            assignments,
            evaluations,
            transfers,
        }
    }

    async fn require_active_assignment(&self, id: Uuid) -> AppResult<Assignment> {
        let assignment = self
            .assignments
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;
        if assignment.status != AssignmentStatus::Active {
            return Err(AppError::conflict("Assignment is not active"));
        }
        Ok(assignment)
    }

    async fn transition_assignment(
        &self,
        id: Uuid,
        status: AssignmentStatus,
    ) -> AppResult<Assignment> {
        let mut assignment = self.require_active_assignment(id).await?;
        assignment.status = status;
        assignment.updated_at = Utc::now();
        self.assignments.update(assignment).await
    }
}

#[async_trait]
impl PracticeService for PracticeManager {
    async fn list_assignments(&self) -> AppResult<Vec<Assignment>> {
        self.assignments.list().await
    }

    async fn get_assignment(&self, id: Uuid) -> AppResult<Assignment> {
        self.assignments
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_assignment(
        &self,
        student_id: Uuid,
        tutor_id: Uuid,
        institution: String,
        period: String,
    ) -> AppResult<Assignment> {
        let existing = self.assignments.find_by_student(student_id).await?;
        if existing
            .iter()
            .any(|a| a.status == AssignmentStatus::Active)
        {
            return Err(AppError::conflict(
                "Student already has an active assignment",
            ));
        }

        let now = Utc::now();
        self.assignments
            .insert(Assignment {
                id: Uuid::new_v4(),
                student_id,
                tutor_id,
                institution,
                period,
                status: AssignmentStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn complete_assignment(&self, id: Uuid) -> AppResult<Assignment> {
        self.transition_assignment(id, AssignmentStatus::Completed)
            .await
    }

    async fn cancel_assignment(&self, id: Uuid) -> AppResult<Assignment> {
        self.transition_assignment(id, AssignmentStatus::Cancelled)
            .await
    }

    async fn list_evaluations(&self, assignment_id: Uuid) -> AppResult<Vec<Evaluation>> {
        self.evaluations.find_by_assignment(assignment_id).await
    }

    async fn record_evaluation(
        &self,
        assignment_id: Uuid,
        cut: EvaluationCut,
        score: f64,
        comments: Option<String>,
    ) -> AppResult<Evaluation> {
        self.require_active_assignment(assignment_id).await?;

        let existing = self.evaluations.find_by_assignment(assignment_id).await?;
        if existing.iter().any(|e| e.cut == cut) {
            return Err(AppError::conflict(
                "Evaluation already recorded for this cut",
            ));
        }

        self.evaluations
            .insert(Evaluation {
                id: Uuid::new_v4(),
                assignment_id,
                cut,
                score,
                comments,
                created_at: Utc::now(),
            })
            .await
    }

    async fn list_transfers(&self) -> AppResult<Vec<Transfer>> {
        self.transfers.list().await
    }

    async fn request_transfer(
        &self,
        assignment_id: Uuid,
        to_institution: String,
        reason: String,
    ) -> AppResult<Transfer> {
        self.require_active_assignment(assignment_id).await?;

        let existing = self.transfers.find_by_assignment(assignment_id).await?;
        if existing.iter().any(|t| t.status == TransferStatus::Pending) {
            return Err(AppError::conflict(
                "Assignment already has a pending transfer",
            ));
        }

        self.transfers
            .insert(Transfer {
                id: Uuid::new_v4(),
                assignment_id,
                to_institution,
                reason,
                status: TransferStatus::Pending,
                created_at: Utc::now(),
                resolved_at: None,
            })
            .await
    }

    async fn resolve_transfer(
        &self,
        id: Uuid,
        decision: TransferDecision,
    ) -> AppResult<Transfer> {
        let mut transfer = self
            .transfers
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if transfer.status != TransferStatus::Pending {
            return Err(AppError::conflict("Transfer already resolved"));
        }

        transfer.status = match decision {
            TransferDecision::Approve => TransferStatus::Approved,
            TransferDecision::Reject => TransferStatus::Rejected,
        };
        transfer.resolved_at = Some(Utc::now());

        if transfer.status == TransferStatus::Approved {
            // Approval carries the assignment to the target institution
            let mut assignment = self
                .assignments
                .find_by_id(transfer.assignment_id)
                .await?
                .ok_or(AppError::NotFound)?;
            assignment.institution = transfer.to_institution.clone();
            assignment.updated_at = Utc::now();
            self.assignments.update(assignment).await?;
        }

        self.transfers.update(transfer).await
    }
}
