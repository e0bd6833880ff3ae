//! Practice placement workflow tests over the in-memory stores.

use std::sync::Arc;

use uuid::Uuid;

use practicas_api::domain::{AssignmentStatus, EvaluationCut, TransferStatus};
use practicas_api::errors::AppError;
use practicas_api::infra::{InMemoryAssignments, InMemoryEvaluations, InMemoryTransfers};
use practicas_api::services::{PracticeManager, PracticeService, TransferDecision};

fn manager() -> PracticeManager {
    PracticeManager::new(
        Arc::new(InMemoryAssignments::new()),
        Arc::new(InMemoryEvaluations::new()),
        Arc::new(InMemoryTransfers::new()),
    )
}

#[tokio::test]
async fn student_cannot_hold_two_active_assignments() {
    let service = manager();
    let student = Uuid::new_v4();

    service
        .create_assignment(
            student,
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();

    let err = service
        .create_assignment(
            student,
            Uuid::new_v4(),
            "Clinica Norte".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn completed_assignment_frees_the_student() {
    let service = manager();
    let student = Uuid::new_v4();

    let first = service
        .create_assignment(
            student,
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();
    let completed = service.complete_assignment(first.id).await.unwrap();
    assert_eq!(completed.status, AssignmentStatus::Completed);

    // A new placement is allowed once the previous one is closed
    service
        .create_assignment(
            student,
            Uuid::new_v4(),
            "Clinica Norte".to_string(),
            "2026-2".to_string(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn lifecycle_transitions_require_an_active_assignment() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();

    service.cancel_assignment(assignment.id).await.unwrap();

    let err = service.complete_assignment(assignment.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = service.cancel_assignment(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn one_evaluation_per_cut() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();

    service
        .record_evaluation(assignment.id, EvaluationCut::Primero, 4.5, None)
        .await
        .unwrap();
    service
        .record_evaluation(
            assignment.id,
            EvaluationCut::Segundo,
            3.8,
            Some("Mejorando".to_string()),
        )
        .await
        .unwrap();

    let err = service
        .record_evaluation(assignment.id, EvaluationCut::Primero, 5.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let evaluations = service.list_evaluations(assignment.id).await.unwrap();
    assert_eq!(evaluations.len(), 2);
}

#[tokio::test]
async fn cannot_evaluate_a_closed_assignment() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();
    service.complete_assignment(assignment.id).await.unwrap();

    let err = service
        .record_evaluation(assignment.id, EvaluationCut::Primero, 4.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn one_pending_transfer_per_assignment() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();

    service
        .request_transfer(
            assignment.id,
            "Clinica Norte".to_string(),
            "relocation".to_string(),
        )
        .await
        .unwrap();

    let err = service
        .request_transfer(
            assignment.id,
            "Clinica Sur".to_string(),
            "second thoughts".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn approved_transfer_moves_the_assignment() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();
    let transfer = service
        .request_transfer(
            assignment.id,
            "Clinica Norte".to_string(),
            "relocation".to_string(),
        )
        .await
        .unwrap();

    let resolved = service
        .resolve_transfer(transfer.id, TransferDecision::Approve)
        .await
        .unwrap();
    assert_eq!(resolved.status, TransferStatus::Approved);
    assert!(resolved.resolved_at.is_some());

    let moved = service.get_assignment(assignment.id).await.unwrap();
    assert_eq!(moved.institution, "Clinica Norte");

    // Resolution remains stable: a new transfer can now be requested
    service
        .request_transfer(
            assignment.id,
            "Clinica Sur".to_string(),
            "another move".to_string(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_transfer_leaves_the_assignment_in_place() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();
    let transfer = service
        .request_transfer(
            assignment.id,
            "Clinica Norte".to_string(),
            "relocation".to_string(),
        )
        .await
        .unwrap();

    let resolved = service
        .resolve_transfer(transfer.id, TransferDecision::Reject)
        .await
        .unwrap();
    assert_eq!(resolved.status, TransferStatus::Rejected);

    let unchanged = service.get_assignment(assignment.id).await.unwrap();
    assert_eq!(unchanged.institution, "Hospital Central");
}

#[tokio::test]
async fn transfer_cannot_be_resolved_twice() {
    let service = manager();
    let assignment = service
        .create_assignment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hospital Central".to_string(),
            "2026-1".to_string(),
        )
        .await
        .unwrap();
    let transfer = service
        .request_transfer(
            assignment.id,
            "Clinica Norte".to_string(),
            "relocation".to_string(),
        )
        .await
        .unwrap();

    service
        .resolve_transfer(transfer.id, TransferDecision::Approve)
        .await
        .unwrap();

    let err = service
        .resolve_transfer(transfer.id, TransferDecision::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
