//! Handlers for the `/workflow-roles` resource and the predefined role
//! catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use bnadmin_core::error::CoreError;
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::{normalize_optional, validate_required, RoleLevel};
use bnadmin_db::models::workflow_role::{CreateWorkflowRole, WorkflowRole};
use bnadmin_db::repositories::WorkflowRoleRepo;

use crate::error::{AppError, AppResult};
use crate::query::{non_blank, ModuleParams};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkflowRole",
        id,
    })
}

fn validated(input: CreateWorkflowRole) -> AppResult<CreateWorkflowRole> {
    let role_name = validate_required("role_name", &input.role_name)?.to_string();
    let module = validate_required("module", &input.module)?.to_string();
    let role_level = match input.role_level.as_deref().map(str::trim) {
        None | Some("") => RoleLevel::default(),
        Some(level) => RoleLevel::from_str_db(level)?,
    };
    Ok(CreateWorkflowRole {
        role_name,
        module,
        role_level: Some(role_level.as_str().to_string()),
        description: normalize_optional(input.description.as_deref()),
    })
}

/// GET /workflow-roles?module=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ModuleParams>,
) -> AppResult<impl IntoResponse> {
    let module = non_blank(params.module);
    let roles = WorkflowRoleRepo::list(&state.pool, module.as_deref()).await?;
    tracing::debug!(count = roles.len(), module = ?module, "Listed workflow roles");
    Ok(Json(DataResponse { data: roles }))
}

/// POST /workflow-roles
///
/// A duplicate `(module, role_name)` is rejected with 409.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflowRole>,
) -> AppResult<impl IntoResponse> {
    let input = validated(input)?;
    let created = WorkflowRoleRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, role_name = %created.role_name, module = %created.module, "Workflow role created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /workflow-roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = WorkflowRoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: role }))
}

/// PUT /workflow-roles/{id}
///
/// Renaming a role does not touch steps that name it in `required_role`.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateWorkflowRole>,
) -> AppResult<impl IntoResponse> {
    let input = validated(input)?;
    let updated = WorkflowRoleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, "Workflow role updated");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /workflow-roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if WorkflowRoleRepo::delete(&state.pool, id).await? {
        tracing::info!(id, "Workflow role deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /workflow-roles/catalog
///
/// The configured module -> role names mapping.
pub async fn catalog(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.role_catalog.as_ref().clone(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SeedResult {
    pub inserted: usize,
    pub roles: Vec<WorkflowRole>,
}

/// POST /workflow-roles/seed
///
/// Inserts catalog roles missing from the table. Idempotent.
pub async fn seed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roles = WorkflowRoleRepo::seed_catalog(&state.pool, &state.role_catalog).await?;
    tracing::info!(inserted = roles.len(), "Role catalog seeded");
    Ok(Json(DataResponse {
        data: SeedResult {
            inserted: roles.len(),
            roles,
        },
    }))
}
