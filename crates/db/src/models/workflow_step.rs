//! Workflow step models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bnadmin_core::types::{DbId, Timestamp};

/// A row from the `workflow_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowStep {
    pub id: DbId,
    pub workflow_id: DbId,
    pub step_name: String,
    pub step_type: String,
    pub step_number: i32,
    /// Role name, matched as free text against `workflow_roles.role_name`.
    pub required_role: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a step. The step number is assigned by the
/// repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkflowStep {
    #[serde(default)]
    pub step_name: String,
    #[serde(default)]
    pub step_type: String,
    pub required_role: Option<String>,
}

/// Full overwrite of a step. The step number is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkflowStep {
    #[serde(default)]
    pub step_name: String,
    #[serde(default)]
    pub step_type: String,
    pub required_role: Option<String>,
}
