//! Handlers for workflow transitions.
//!
//! Endpoints accept a step id, `null`, or `"none"` for the workflow
//! boundary. Step ids are stored as given: they are not checked for
//! existence or membership in the transition's definition.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bnadmin_core::error::CoreError;
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::{resolve_step_ref, validate_required, TriggerType};
use bnadmin_db::models::workflow_transition::{CreateWorkflowTransition, TransitionRequest};
use bnadmin_db::repositories::{WorkflowStepRepo, WorkflowTransitionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::labelled_transitions;
use crate::handlers::workflow_definition::ensure_definition_exists;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkflowTransition",
        id,
    })
}

/// Resolve a request body into the row to write. A missing trigger type
/// defaults to `manual`.
fn resolve_request(input: &TransitionRequest) -> AppResult<CreateWorkflowTransition> {
    let transition_name = validate_required("transition_name", &input.transition_name)?;
    let trigger_type = match input.trigger_type.as_deref().map(str::trim) {
        None | Some("") => TriggerType::Manual,
        Some(t) => TriggerType::from_str_db(t)?,
    };
    Ok(CreateWorkflowTransition {
        transition_name: transition_name.to_string(),
        from_step_id: resolve_step_ref(input.from_step_id.as_ref())?,
        to_step_id: resolve_step_ref(input.to_step_id.as_ref())?,
        trigger_type: trigger_type.as_str().to_string(),
    })
}

/// GET /workflow-definitions/{id}/transitions
///
/// Each transition carries `from_label` and `to_label` resolved against the
/// definition's steps.
pub async fn list_by_definition(
    State(state): State<AppState>,
    Path(workflow_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let steps = WorkflowStepRepo::list_by_workflow(&state.pool, workflow_id).await?;
    let transitions = WorkflowTransitionRepo::list_by_workflow(&state.pool, workflow_id).await?;

    tracing::debug!(workflow_id, count = transitions.len(), "Listed workflow transitions");
    Ok(Json(DataResponse {
        data: labelled_transitions(&steps, transitions),
    }))
}

/// POST /workflow-definitions/{id}/transitions
pub async fn create(
    State(state): State<AppState>,
    Path(workflow_id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let input = resolve_request(&input)?;
    ensure_definition_exists(&state.pool, workflow_id).await?;

    let created = WorkflowTransitionRepo::create(&state.pool, workflow_id, &input).await?;
    tracing::info!(
        id = created.id,
        workflow_id,
        from_step_id = ?created.from_step_id,
        to_step_id = ?created.to_step_id,
        "Workflow transition created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /workflow-transitions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transition = WorkflowTransitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: transition }))
}

/// PUT /workflow-transitions/{id}
///
/// Full overwrite: omitted endpoints become the workflow boundary.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let input = resolve_request(&input)?;
    let updated = WorkflowTransitionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, "Workflow transition updated");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /workflow-transitions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if WorkflowTransitionRepo::delete(&state.pool, id).await? {
        tracing::info!(id, "Workflow transition deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
