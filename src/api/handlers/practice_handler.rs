//! Practice placement handlers - assignments, evaluations, transfers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Assignment, Evaluation, EvaluationCut, Transfer};
use crate::errors::AppResult;
use crate::services::TransferDecision;
use crate::types::Created;

/// Assignment creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentRequest {
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    #[validate(length(min = 1, message = "Institution is required"))]
    #[schema(example = "Congregación Sion Norte")]
    pub institution: String,
    #[validate(length(min = 1, message = "Period is required"))]
    #[schema(example = "2026-1")]
    pub period: String,
}

/// Evaluation recording request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordEvaluationRequest {
    pub assignment_id: Uuid,
    pub cut: EvaluationCut,
    #[validate(range(min = 0.0, max = 5.0, message = "Score must be between 0 and 5"))]
    #[schema(example = 4.2)]
    pub score: f64,
    pub comments: Option<String>,
}

/// Evaluation list filter
#[derive(Debug, Deserialize)]
pub struct EvaluationQuery {
    pub assignment_id: Uuid,
}

/// Transfer request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestTransferRequest {
    pub assignment_id: Uuid,
    #[validate(length(min = 1, message = "Target institution is required"))]
    pub to_institution: String,
    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
}

/// Transfer resolution payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveTransferRequest {
    pub decision: Decision,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl From<Decision> for TransferDecision {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Approve => TransferDecision::Approve,
            Decision::Reject => TransferDecision::Reject,
        }
    }
}

/// Assignment read routes
pub fn assignment_read_routes() -> Router<AppState> {
    Router::new().route("/", get(list_assignments))
}

/// Assignment mutation routes (separate gate)
pub fn assignment_write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment))
        .route("/:id/complete", post(complete_assignment))
        .route("/:id/cancel", post(cancel_assignment))
}

/// Evaluation read routes
pub fn evaluation_read_routes() -> Router<AppState> {
    Router::new().route("/", get(list_evaluations))
}

/// Evaluation mutation routes (separate gate)
pub fn evaluation_write_routes() -> Router<AppState> {
    Router::new().route("/", post(record_evaluation))
}

/// Transfer routes
pub fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transfers).post(request_transfer))
        .route("/:id/resolve", post(resolve_transfer))
}

/// List all assignments
#[utoipa::path(
    get,
    path = "/assignments",
    tag = "Practice",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All assignments", body = [Assignment]))
)]
pub async fn list_assignments(State(state): State<AppState>) -> AppResult<Json<Vec<Assignment>>> {
    let assignments = state.practice_service.list_assignments().await?;
    Ok(Json(assignments))
}

/// Create an assignment
#[utoipa::path(
    post,
    path = "/assignments",
    tag = "Practice",
    security(("bearer_auth" = [])),
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 409, description = "Student already has an active assignment")
    )
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAssignmentRequest>,
) -> AppResult<Created<Assignment>> {
    let assignment = state
        .practice_service
        .create_assignment(
            payload.student_id,
            payload.tutor_id,
            payload.institution,
            payload.period,
        )
        .await?;
    Ok(Created(assignment))
}

/// Mark an assignment completed
#[utoipa::path(
    post,
    path = "/assignments/{id}/complete",
    tag = "Practice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment completed", body = Assignment),
        (status = 409, description = "Assignment is not active")
    )
)]
pub async fn complete_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Assignment>> {
    let assignment = state.practice_service.complete_assignment(id).await?;
    Ok(Json(assignment))
}

/// Cancel an assignment
#[utoipa::path(
    post,
    path = "/assignments/{id}/cancel",
    tag = "Practice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment cancelled", body = Assignment),
        (status = 409, description = "Assignment is not active")
    )
)]
pub async fn cancel_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Assignment>> {
    let assignment = state.practice_service.cancel_assignment(id).await?;
    Ok(Json(assignment))
}

/// List evaluations for an assignment
#[utoipa::path(
    get,
    path = "/evaluations",
    tag = "Practice",
    security(("bearer_auth" = [])),
    params(("assignment_id" = Uuid, Query, description = "Assignment ID")),
    responses((status = 200, description = "Evaluations", body = [Evaluation]))
)]
pub async fn list_evaluations(
    State(state): State<AppState>,
    Query(query): Query<EvaluationQuery>,
) -> AppResult<Json<Vec<Evaluation>>> {
    let evaluations = state
        .practice_service
        .list_evaluations(query.assignment_id)
        .await?;
    Ok(Json(evaluations))
}

/// Record an evaluation for a cut
#[utoipa::path(
    post,
    path = "/evaluations",
    tag = "Practice",
    security(("bearer_auth" = [])),
    request_body = RecordEvaluationRequest,
    responses(
        (status = 201, description = "Evaluation recorded", body = Evaluation),
        (status = 409, description = "Cut already evaluated or assignment not active")
    )
)]
pub async fn record_evaluation(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RecordEvaluationRequest>,
) -> AppResult<Created<Evaluation>> {
    let evaluation = state
        .practice_service
        .record_evaluation(
            payload.assignment_id,
            payload.cut,
            payload.score,
            payload.comments,
        )
        .await?;
    Ok(Created(evaluation))
}

/// List all transfers
#[utoipa::path(
    get,
    path = "/transfers",
    tag = "Practice",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All transfers", body = [Transfer]))
)]
pub async fn list_transfers(State(state): State<AppState>) -> AppResult<Json<Vec<Transfer>>> {
    let transfers = state.practice_service.list_transfers().await?;
    Ok(Json(transfers))
}

/// Request a transfer for an active assignment
#[utoipa::path(
    post,
    path = "/transfers",
    tag = "Practice",
    security(("bearer_auth" = [])),
    request_body = RequestTransferRequest,
    responses(
        (status = 201, description = "Transfer requested", body = Transfer),
        (status = 409, description = "Pending transfer already exists")
    )
)]
pub async fn request_transfer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RequestTransferRequest>,
) -> AppResult<Created<Transfer>> {
    let transfer = state
        .practice_service
        .request_transfer(payload.assignment_id, payload.to_institution, payload.reason)
        .await?;
    Ok(Created(transfer))
}

/// Resolve a pending transfer
#[utoipa::path(
    post,
    path = "/transfers/{id}/resolve",
    tag = "Practice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Transfer ID")),
    request_body = ResolveTransferRequest,
    responses(
        (status = 200, description = "Transfer resolved", body = Transfer),
        (status = 409, description = "Transfer already resolved")
    )
)]
pub async fn resolve_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveTransferRequest>,
) -> AppResult<Json<Transfer>> {
    let transfer = state
        .practice_service
        .resolve_transfer(id, payload.decision.into())
        .await?;
    Ok(Json(transfer))
}
