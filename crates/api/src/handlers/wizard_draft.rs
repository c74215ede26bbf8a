//! Handlers for builder wizard drafts.
//!
//! A draft is checkpointed under a client-chosen wizard key, either whole
//! (`PUT`) or one reducer action at a time (`POST .../actions`). Stored
//! drafts from older schema versions are upgraded when read. Submitting a
//! draft writes the definition, its steps and its transitions in one
//! transaction and discards the draft.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use bnadmin_core::builder_draft::{self, BuilderAction, BuilderDraft, CURRENT_SCHEMA_VERSION};
use bnadmin_core::types::Timestamp;
use bnadmin_core::workflow::validate_required;
use bnadmin_db::models::wizard_draft::WizardDraft;
use bnadmin_db::repositories::{WizardDraftRepo, WorkflowBuilderRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A draft as returned to clients, always at the current schema version.
#[derive(Debug, Serialize)]
pub struct DraftView {
    pub wizard_key: String,
    pub schema_version: i32,
    pub draft: BuilderDraft,
    pub updated_at: Timestamp,
}

/// Body of `PUT /wizard-drafts/{wizard_key}`.
///
/// `schema_version` defaults to the current version; older payloads are
/// upgraded before they are stored.
#[derive(Debug, Deserialize)]
pub struct CheckpointRequest {
    pub schema_version: Option<i32>,
    pub draft: serde_json::Value,
}

fn draft_not_found(wizard_key: &str) -> AppError {
    AppError::NotFound(format!("No draft stored for wizard '{wizard_key}'"))
}

/// Upgrade a stored row to the current schema.
fn load_row(row: &WizardDraft) -> AppResult<BuilderDraft> {
    Ok(builder_draft::load(row.schema_version, row.payload.clone())?)
}

fn to_payload(draft: &BuilderDraft) -> AppResult<serde_json::Value> {
    serde_json::to_value(draft)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize draft: {e}")))
}

/// Build the client view of a row stored at the current schema version.
fn view_of(row: WizardDraft) -> AppResult<DraftView> {
    let draft = load_row(&row)?;
    Ok(DraftView {
        wizard_key: row.wizard_key,
        schema_version: row.schema_version,
        draft,
        updated_at: row.updated_at,
    })
}

/// GET /wizard-drafts/{wizard_key}
///
/// Drafts stored at an older schema version are rewritten at the current
/// one.
pub async fn get_draft(
    State(state): State<AppState>,
    Path(wizard_key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = validate_required("wizard_key", &wizard_key)?;
    let row = WizardDraftRepo::find_by_key(&state.pool, key)
        .await?
        .ok_or_else(|| draft_not_found(key))?;

    if row.schema_version >= CURRENT_SCHEMA_VERSION {
        return Ok(Json(DataResponse { data: view_of(row)? }));
    }

    // Re-read under the key's lock so a concurrent action is not overwritten
    // with the stale upgraded payload.
    let from = row.schema_version;
    let row = WizardDraftRepo::modify(&state.pool, key, CURRENT_SCHEMA_VERSION, |current| {
        let current = current.ok_or_else(|| draft_not_found(key))?;
        to_payload(&load_row(&current)?)
    })
    .await?;
    tracing::info!(
        wizard_key = key,
        from,
        to = CURRENT_SCHEMA_VERSION,
        "Upgraded stored wizard draft"
    );
    Ok(Json(DataResponse { data: view_of(row)? }))
}

/// PUT /wizard-drafts/{wizard_key}
pub async fn put_draft(
    State(state): State<AppState>,
    Path(wizard_key): Path<String>,
    Json(input): Json<CheckpointRequest>,
) -> AppResult<impl IntoResponse> {
    let key = validate_required("wizard_key", &wizard_key)?;
    let version = input.schema_version.unwrap_or(CURRENT_SCHEMA_VERSION);
    let draft = builder_draft::load(version, input.draft)?;

    let row =
        WizardDraftRepo::upsert(&state.pool, key, CURRENT_SCHEMA_VERSION, &to_payload(&draft)?)
            .await?;
    tracing::debug!(wizard_key = key, stage = ?draft.stage, "Wizard draft checkpointed");
    Ok(Json(DataResponse {
        data: DraftView {
            wizard_key: row.wizard_key,
            schema_version: row.schema_version,
            draft,
            updated_at: row.updated_at,
        },
    }))
}

/// DELETE /wizard-drafts/{wizard_key}
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(wizard_key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = validate_required("wizard_key", &wizard_key)?;
    if WizardDraftRepo::delete_by_key(&state.pool, key).await? {
        tracing::info!(wizard_key = key, "Wizard draft discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(draft_not_found(key))
    }
}

/// POST /wizard-drafts/{wizard_key}/actions
///
/// Applies one reducer action to the stored draft (or an empty one) and
/// checkpoints the result. The read and the write happen under the key's
/// lock, so concurrent actions on one key are applied in turn. A rejected
/// action leaves the stored draft unchanged.
pub async fn apply_action(
    State(state): State<AppState>,
    Path(wizard_key): Path<String>,
    Json(action): Json<BuilderAction>,
) -> AppResult<impl IntoResponse> {
    let key = validate_required("wizard_key", &wizard_key)?;
    let row = WizardDraftRepo::modify(&state.pool, key, CURRENT_SCHEMA_VERSION, |current| {
        let current = match current {
            Some(row) => load_row(&row)?,
            None => BuilderDraft::default(),
        };
        to_payload(&builder_draft::apply(&current, action)?)
    })
    .await?;

    let view = view_of(row)?;
    tracing::debug!(
        wizard_key = key,
        steps = view.draft.steps.len(),
        transitions = view.draft.transitions.len(),
        "Wizard draft action applied"
    );
    Ok(Json(DataResponse { data: view }))
}

/// POST /wizard-drafts/{wizard_key}/submit
///
/// Only one of several concurrent submits of a draft succeeds; the others
/// find the draft gone and get 404.
pub async fn submit(
    State(state): State<AppState>,
    Path(wizard_key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = validate_required("wizard_key", &wizard_key)?;
    let created = WorkflowBuilderRepo::materialize(&state.pool, key, |row| {
        let draft = load_row(row)?;
        Ok::<_, AppError>(builder_draft::plan_submission(&draft)?)
    })
    .await?
    .ok_or_else(|| draft_not_found(key))?;

    tracing::info!(
        wizard_key = key,
        definition_id = created.definition.id,
        steps = created.steps.len(),
        transitions = created.transitions.len(),
        "Workflow built from wizard draft"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
