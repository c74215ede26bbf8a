//! Workflow definition models and DTOs.
//!
//! Defines the database row struct for `workflow_definitions` and the
//! create/update/filter types used by the API layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bnadmin_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `workflow_definitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowDefinition {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub workflow_type: String,
    pub module: String,
    pub version: i32,
    pub is_active: bool,
    pub configuration: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a definition. Version starts at 1, active, with an
/// empty configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkflowDefinition {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub workflow_type: String,
    #[serde(default)]
    pub module: String,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Full overwrite of a definition's descriptive fields.
///
/// `description: None` clears the description. `version` and
/// `configuration` keep their stored value when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkflowDefinition {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub workflow_type: String,
    #[serde(default)]
    pub module: String,
    pub version: Option<i32>,
    pub configuration: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// List filter
// ---------------------------------------------------------------------------

/// Filters for listing definitions. `None` fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct WorkflowDefinitionFilter {
    pub module: Option<String>,
    pub workflow_type: Option<String>,
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
}
