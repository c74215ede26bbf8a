//! Workflow role models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bnadmin_core::types::{DbId, Timestamp};

/// A row from the `workflow_roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowRole {
    pub id: DbId,
    pub role_name: String,
    pub module: String,
    pub role_level: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a role. `role_level` defaults to `module`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkflowRole {
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub module: String,
    pub role_level: Option<String>,
    pub description: Option<String>,
}

/// Full overwrite of a role.
///
/// Renaming a role does not touch steps whose `required_role` holds the
/// old name.
pub type UpdateWorkflowRole = CreateWorkflowRole;
