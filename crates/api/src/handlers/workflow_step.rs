//! Handlers for workflow steps.
//!
//! Steps are listed and created under their definition
//! (`/workflow-definitions/{id}/steps`) and addressed directly by id
//! (`/workflow-steps/{id}`) afterwards.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bnadmin_core::error::CoreError;
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::{normalize_optional, validate_required, StepType};
use bnadmin_db::models::workflow_step::{CreateWorkflowStep, UpdateWorkflowStep, WorkflowStep};
use bnadmin_db::repositories::{WorkflowStepRepo, WorkflowTransitionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::labelled_transitions;
use crate::handlers::workflow_definition::ensure_definition_exists;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) async fn ensure_step_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<WorkflowStep> {
    WorkflowStepRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkflowStep",
        id,
    })
}

/// Trimmed `(step_name, step_type, required_role)`.
fn validated_fields(
    step_name: &str,
    step_type: &str,
    required_role: Option<&str>,
) -> AppResult<(String, String, Option<String>)> {
    let step_name = validate_required("step_name", step_name)?.to_string();
    let step_type = validate_required("step_type", step_type)?;
    let step_type = StepType::from_str_db(step_type)?.as_str().to_string();
    Ok((step_name, step_type, normalize_optional(required_role)))
}

/// GET /workflow-definitions/{id}/steps
///
/// Ordered by `step_number`. Steps left behind by a deleted definition are
/// still listed.
pub async fn list_by_definition(
    State(state): State<AppState>,
    Path(workflow_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let steps = WorkflowStepRepo::list_by_workflow(&state.pool, workflow_id).await?;
    tracing::debug!(workflow_id, count = steps.len(), "Listed workflow steps");
    Ok(Json(DataResponse { data: steps }))
}

/// POST /workflow-definitions/{id}/steps
///
/// The step number is assigned by the server.
pub async fn create(
    State(state): State<AppState>,
    Path(workflow_id): Path<DbId>,
    Json(input): Json<CreateWorkflowStep>,
) -> AppResult<impl IntoResponse> {
    let (step_name, step_type, required_role) =
        validated_fields(&input.step_name, &input.step_type, input.required_role.as_deref())?;
    ensure_definition_exists(&state.pool, workflow_id).await?;

    let input = CreateWorkflowStep {
        step_name,
        step_type,
        required_role,
    };
    let created = WorkflowStepRepo::create(&state.pool, workflow_id, &input).await?;

    tracing::info!(
        id = created.id,
        workflow_id,
        step_number = created.step_number,
        "Workflow step created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /workflow-steps/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let step = ensure_step_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: step }))
}

/// PUT /workflow-steps/{id}
///
/// Overwrites name, type and required role. The step number never changes.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflowStep>,
) -> AppResult<impl IntoResponse> {
    let (step_name, step_type, required_role) =
        validated_fields(&input.step_name, &input.step_type, input.required_role.as_deref())?;
    let input = UpdateWorkflowStep {
        step_name,
        step_type,
        required_role,
    };

    let updated = WorkflowStepRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, "Workflow step updated");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /workflow-steps/{id}
///
/// Transitions referencing the step keep their now-dangling endpoint.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if WorkflowStepRepo::delete(&state.pool, id).await? {
        tracing::info!(id, "Workflow step deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /workflow-steps/{id}/transitions
///
/// Transitions leaving the step, labelled against the steps of the step's
/// own definition.
pub async fn list_outgoing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let step = ensure_step_exists(&state.pool, id).await?;
    let siblings = WorkflowStepRepo::list_by_workflow(&state.pool, step.workflow_id).await?;
    let transitions = WorkflowTransitionRepo::list_from_step(&state.pool, id).await?;

    tracing::debug!(step_id = id, count = transitions.len(), "Listed outgoing transitions");
    Ok(Json(DataResponse {
        data: labelled_transitions(&siblings, transitions),
    }))
}
