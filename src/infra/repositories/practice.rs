//! Practice-placement repositories: assignments, evaluations, transfers.
//!
//! These are in-memory stores behind the same trait seam as the SeaORM
//! stores. The placement workflow invariants live in the service layer;
//! these repositories only hold state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Assignment, AssignmentStatus, Evaluation, Transfer, TransferStatus};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Assignment persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>>;

    async fn list(&self) -> AppResult<Vec<Assignment>>;

    /// Assignments for a student, any status
    async fn find_by_student(&self, student_id: Uuid) -> AppResult<Vec<Assignment>>;

    async fn insert(&self, assignment: Assignment) -> AppResult<Assignment>;

    async fn update(&self, assignment: Assignment) -> AppResult<Assignment>;
}

/// Evaluation persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    async fn find_by_assignment(&self, assignment_id: Uuid) -> AppResult<Vec<Evaluation>>;

    async fn insert(&self, evaluation: Evaluation) -> AppResult<Evaluation>;
}

/// Transfer persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransferRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transfer>>;

    async fn list(&self) -> AppResult<Vec<Transfer>>;

    async fn find_by_assignment(&self, assignment_id: Uuid) -> AppResult<Vec<Transfer>>;

    async fn insert(&self, transfer: Transfer) -> AppResult<Transfer>;

    async fn update(&self, transfer: Transfer) -> AppResult<Transfer>;
}

/// In-memory assignment store.
#[derive(Default)]
pub struct InMemoryAssignments {
    items: Arc<RwLock<Vec<Assignment>>>,
}

impl InMemoryAssignments {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignments {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Assignment>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_student(&self, student_id: Uuid) -> AppResult<Vec<Assignment>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, assignment: Assignment) -> AppResult<Assignment> {
        let mut items = self.items.write().await;
        items.push(assignment.clone());
        Ok(assignment)
    }

    async fn update(&self, assignment: Assignment) -> AppResult<Assignment> {
        let mut items = self.items.write().await;
        if let Some(slot) = items.iter_mut().find(|a| a.id == assignment.id) {
            *slot = assignment.clone();
        }
        Ok(assignment)
    }
}

/// In-memory evaluation store.
#[derive(Default)]
pub struct InMemoryEvaluations {
    items: Arc<RwLock<Vec<Evaluation>>>,
}

impl InMemoryEvaluations {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluations {
    async fn find_by_assignment(&self, assignment_id: Uuid) -> AppResult<Vec<Evaluation>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|e| e.assignment_id == assignment_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, evaluation: Evaluation) -> AppResult<Evaluation> {
        let mut items = self.items.write().await;
        items.push(evaluation.clone());
        Ok(evaluation)
    }
}

/// In-memory transfer store.
#[derive(Default)]
pub struct InMemoryTransfers {
    items: Arc<RwLock<Vec<Transfer>>>,
}

impl InMemoryTransfers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransferRepository for InMemoryTransfers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transfer>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Transfer>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_assignment(&self, assignment_id: Uuid) -> AppResult<Vec<Transfer>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|t| t.assignment_id == assignment_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, transfer: Transfer) -> AppResult<Transfer> {
        let mut items = self.items.write().await;
        items.push(transfer.clone());
        Ok(transfer)
    }

    async fn update(&self, transfer: Transfer) -> AppResult<Transfer> {
        let mut items = self.items.write().await;
        if let Some(slot) = items.iter_mut().find(|t| t.id == transfer.id) {
            *slot = transfer.clone();
        }
        Ok(transfer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_assignment(student_id: Uuid) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: Uuid::new_v4(),
            student_id,
            tutor_id: Uuid::new_v4(),
            institution: "Hospital Central".to_string(),
            period: "2026-1".to_string(),
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn assignment_update_replaces_in_place() {
        let repo = InMemoryAssignments::new();
        let student = Uuid::new_v4();
        let a = repo.insert(sample_assignment(student)).await.unwrap();

        let mut changed = a.clone();
        changed.status = AssignmentStatus::Completed;
        repo.update(changed).await.unwrap();

        let found = repo.find_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(found.status, AssignmentStatus::Completed);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transfers_filter_by_assignment() {
        let repo = InMemoryTransfers::new();
        let assignment_id = Uuid::new_v4();
        repo.insert(Transfer {
            id: Uuid::new_v4(),
            assignment_id,
            to_institution: "Clinica Norte".to_string(),
            reason: "relocation".to_string(),
            status: TransferStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        })
        .await
        .unwrap();

        assert_eq!(repo.find_by_assignment(assignment_id).await.unwrap().len(), 1);
        assert!(repo
            .find_by_assignment(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }
}
