//! Workflow transition models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bnadmin_core::types::{DbId, Timestamp};
use bnadmin_core::workflow::StepRefInput;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `workflow_transitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowTransition {
    pub id: DbId,
    pub workflow_id: DbId,
    pub transition_name: String,
    /// `None` is the workflow start.
    pub from_step_id: Option<DbId>,
    /// `None` is the workflow end.
    pub to_step_id: Option<DbId>,
    pub trigger_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A transition with both endpoints resolved to display labels.
#[derive(Debug, Clone, Serialize)]
pub struct LabelledTransition {
    #[serde(flatten)]
    pub transition: WorkflowTransition,
    pub from_label: String,
    pub to_label: String,
}

// ---------------------------------------------------------------------------
// Create / update DTOs (internal, used by repository)
// ---------------------------------------------------------------------------

/// Validated input for inserting a transition.
#[derive(Debug, Clone)]
pub struct CreateWorkflowTransition {
    pub transition_name: String,
    pub from_step_id: Option<DbId>,
    pub to_step_id: Option<DbId>,
    pub trigger_type: String,
}

/// Validated full overwrite of a transition.
pub type UpdateWorkflowTransition = CreateWorkflowTransition;

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Request body for creating or replacing a transition.
///
/// Endpoints accept a step id, `null`/absent, or `"none"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionRequest {
    #[serde(default)]
    pub transition_name: String,
    #[serde(default)]
    pub from_step_id: Option<StepRefInput>,
    #[serde(default)]
    pub to_step_id: Option<StepRefInput>,
    pub trigger_type: Option<String>,
}
