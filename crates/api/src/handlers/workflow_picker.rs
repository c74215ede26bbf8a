//! Cascading definition -> step -> role/transition picker.
//!
//! The client sends its current selections as query parameters; the server
//! rebuilds the selection, drops whatever no longer fits its parent, and
//! returns the options for every level.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use bnadmin_core::picker::CascadingSelection;
use bnadmin_core::role_catalog::{merge_eligible_roles, EligibleRole};
use bnadmin_core::types::DbId;
use bnadmin_db::models::workflow_definition::WorkflowDefinition;
use bnadmin_db::models::workflow_step::WorkflowStep;
use bnadmin_db::models::workflow_transition::LabelledTransition;
use bnadmin_db::repositories::{
    WorkflowDefinitionRepo, WorkflowRoleRepo, WorkflowStepRepo, WorkflowTransitionRepo,
};

use crate::error::AppResult;
use crate::handlers::labelled_transitions;
use crate::query::non_blank;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /workflow-picker`.
#[derive(Debug, Default, Deserialize)]
pub struct PickerParams {
    pub definition_id: Option<DbId>,
    pub step_id: Option<DbId>,
    pub role_name: Option<String>,
    pub transition_id: Option<DbId>,
}

/// Resolved selection plus the options offered at each level.
#[derive(Debug, Serialize)]
pub struct PickerView {
    pub selection: CascadingSelection,
    pub definitions: Vec<WorkflowDefinition>,
    /// Steps of the selected definition, by step number.
    pub steps: Vec<WorkflowStep>,
    /// Stored roles of the definition's module merged with its catalog
    /// names. Empty until a step is selected.
    pub roles: Vec<EligibleRole>,
    /// Transitions leaving the selected step.
    pub transitions: Vec<LabelledTransition>,
}

/// GET /workflow-picker
pub async fn picker(
    State(state): State<AppState>,
    Query(params): Query<PickerParams>,
) -> AppResult<impl IntoResponse> {
    let mut selection = CascadingSelection::new();
    selection.select_definition(params.definition_id);
    selection.select_step(params.step_id);
    selection.select_role(non_blank(params.role_name));
    selection.select_transition(params.transition_id);

    let definitions = WorkflowDefinitionRepo::list_all(&state.pool).await?;
    let definition = selection
        .definition_id
        .and_then(|id| definitions.iter().find(|d| d.id == id));

    let steps = match definition {
        Some(d) => WorkflowStepRepo::list_by_workflow(&state.pool, d.id).await?,
        None => Vec::new(),
    };
    let step = selection
        .step_id
        .and_then(|id| steps.iter().find(|s| s.id == id));

    let (roles, transitions) = match (definition, step) {
        (Some(d), Some(s)) => {
            let stored = WorkflowRoleRepo::list(&state.pool, Some(d.module.as_str())).await?;
            let roles = merge_eligible_roles(
                stored.iter().map(|r| (r.id, r.role_name.as_str())),
                state.role_catalog.roles_for(&d.module),
            );
            let outgoing = WorkflowTransitionRepo::list_from_step(&state.pool, s.id).await?;
            (roles, labelled_transitions(&steps, outgoing))
        }
        _ => (Vec::new(), Vec::new()),
    };

    selection.retain_consistent(
        definition.is_some(),
        |id| steps.iter().any(|s| s.id == id),
        |name| roles.iter().any(|r| r.role_name == name),
        |id| transitions.iter().any(|t| t.transition.id == id),
    );

    tracing::debug!(
        definitions = definitions.len(),
        steps = steps.len(),
        roles = roles.len(),
        transitions = transitions.len(),
        "Resolved workflow picker"
    );
    Ok(Json(DataResponse {
        data: PickerView {
            selection,
            definitions,
            steps,
            roles,
            transitions,
        },
    }))
}
