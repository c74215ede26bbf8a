//! Handlers for the `/workflow-definitions` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use bnadmin_core::error::CoreError;
use bnadmin_core::graph::{self, IntegrityReport, StepNode, TransitionEdge};
use bnadmin_core::pagination::PageWindow;
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::{
    normalize_optional, validate_required, validate_version, WorkflowType,
};
use bnadmin_db::models::workflow_definition::{
    CreateWorkflowDefinition, UpdateWorkflowDefinition, WorkflowDefinition,
    WorkflowDefinitionFilter,
};
use bnadmin_db::models::workflow_step::WorkflowStep;
use bnadmin_db::models::workflow_transition::LabelledTransition;
use bnadmin_db::repositories::{
    WorkflowDefinitionRepo, WorkflowStepRepo, WorkflowTransitionRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::labelled_transitions;
use crate::query::non_blank;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Query parameters for `GET /workflow-definitions`.
#[derive(Debug, Default, Deserialize)]
pub struct ListDefinitionsParams {
    pub module: Option<String>,
    pub workflow_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Verify that a definition exists, returning the full row.
pub(crate) async fn ensure_definition_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<WorkflowDefinition> {
    WorkflowDefinitionRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkflowDefinition",
        id,
    })
}

/// Trim and check the mandatory fields shared by create and update.
fn validated_fields(
    name: &str,
    description: Option<&str>,
    workflow_type: &str,
    module: &str,
) -> AppResult<(String, Option<String>, String, String)> {
    let name = validate_required("name", name)?.to_string();
    let workflow_type = validate_required("workflow_type", workflow_type)?;
    let workflow_type = WorkflowType::from_str_db(workflow_type)?.as_str().to_string();
    let module = validate_required("module", module)?.to_string();
    Ok((name, normalize_optional(description), workflow_type, module))
}

/// GET /workflow-definitions
///
/// Most recently updated first, page-based.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListDefinitionsParams>,
) -> AppResult<impl IntoResponse> {
    let workflow_type = non_blank(params.workflow_type);
    if let Some(t) = workflow_type.as_deref() {
        WorkflowType::from_str_db(t)?;
    }
    let filter = WorkflowDefinitionFilter {
        module: non_blank(params.module),
        workflow_type,
        search: non_blank(params.search),
    };
    let window = PageWindow::new(params.page, params.per_page);

    let total = WorkflowDefinitionRepo::count(&state.pool, &filter).await?;
    let data =
        WorkflowDefinitionRepo::list(&state.pool, &filter, window.limit(), window.offset()).await?;

    tracing::debug!(count = data.len(), total, page = window.page, "Listed workflow definitions");
    Ok(Json(PageResponse {
        data,
        total,
        page: window.page,
        per_page: window.per_page,
    }))
}

/// POST /workflow-definitions
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflowDefinition>,
) -> AppResult<impl IntoResponse> {
    let (name, description, workflow_type, module) = validated_fields(
        &input.name,
        input.description.as_deref(),
        &input.workflow_type,
        &input.module,
    )?;
    let input = CreateWorkflowDefinition {
        name,
        description,
        workflow_type,
        module,
    };

    let created = WorkflowDefinitionRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Workflow definition created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /workflow-definitions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let definition = ensure_definition_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: definition }))
}

/// PUT /workflow-definitions/{id}
///
/// Full overwrite of name, description, workflow type and module. The
/// version is caller-supplied and may not go backwards.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflowDefinition>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_definition_exists(&state.pool, id).await?;

    let (name, description, workflow_type, module) = validated_fields(
        &input.name,
        input.description.as_deref(),
        &input.workflow_type,
        &input.module,
    )?;
    if let Some(version) = input.version {
        validate_version(existing.version, version)?;
    }
    if let Some(configuration) = &input.configuration {
        if !configuration.is_object() {
            return Err(AppError::BadRequest(
                "configuration must be a JSON object".to_string(),
            ));
        }
    }

    let input = UpdateWorkflowDefinition {
        name,
        description,
        workflow_type,
        module,
        version: input.version,
        configuration: input.configuration,
    };
    let updated = WorkflowDefinitionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, version = updated.version, "Workflow definition updated");
    Ok(Json(DataResponse { data: updated }))
}

/// POST /workflow-definitions/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = WorkflowDefinitionRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, is_active = updated.is_active, "Workflow definition toggled");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /workflow-definitions/{id}
///
/// Steps and transitions of the definition are left in place.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if WorkflowDefinitionRepo::delete(&state.pool, id).await? {
        tracing::info!(id, "Workflow definition deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// Steps, labelled transitions and integrity findings of one definition.
#[derive(Debug, Serialize)]
pub struct WorkflowGraph {
    pub definition: WorkflowDefinition,
    pub steps: Vec<WorkflowStep>,
    pub transitions: Vec<LabelledTransition>,
    pub integrity: IntegrityReport,
}

/// GET /workflow-definitions/{id}/graph
pub async fn graph(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let definition = ensure_definition_exists(&state.pool, id).await?;
    let steps = WorkflowStepRepo::list_by_workflow(&state.pool, id).await?;
    let transitions = WorkflowTransitionRepo::list_by_workflow(&state.pool, id).await?;

    let nodes: Vec<StepNode<'_>> = steps
        .iter()
        .map(|s| StepNode {
            id: s.id,
            step_number: s.step_number,
            name: &s.step_name,
        })
        .collect();
    let edges: Vec<TransitionEdge> = transitions
        .iter()
        .map(|t| TransitionEdge {
            id: t.id,
            from_step_id: t.from_step_id,
            to_step_id: t.to_step_id,
        })
        .collect();
    let integrity = graph::analyze(&nodes, &edges);

    if !integrity.is_clean() {
        tracing::debug!(
            id,
            dangling = integrity.dangling_endpoints.len(),
            unconnected = integrity.unconnected_step_ids.len(),
            "Workflow graph has integrity findings"
        );
    }

    let transitions = labelled_transitions(&steps, transitions);
    Ok(Json(DataResponse {
        data: WorkflowGraph {
            definition,
            steps,
            transitions,
            integrity,
        },
    }))
}
