//! Workflow definition catalogs and validation.
//!
//! Defines the fixed tag catalogs used by workflow definitions, steps,
//! transitions and roles, the required-field checks applied before any
//! row is written, and the step numbering rule.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length for names (definition, step, transition, role).
pub const MAX_NAME_LENGTH: usize = 200;

/// Version assigned to a newly created definition.
pub const INITIAL_VERSION: i32 = 1;

/// Sentinel accepted in place of a step id to mean "start" or "end".
pub const STEP_REF_NONE: &str = "none";

// ---------------------------------------------------------------------------
// Catalog enums
// ---------------------------------------------------------------------------

/// Business process a workflow definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    LegalDeposit,
    Cataloging,
    Cbm,
    Ged,
    Payment,
    Content,
}

impl WorkflowType {
    pub const ALL: [WorkflowType; 6] = [
        Self::LegalDeposit,
        Self::Cataloging,
        Self::Cbm,
        Self::Ged,
        Self::Payment,
        Self::Content,
    ];

    /// Parse a workflow type string from the database or a request.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| invalid_tag("workflow_type", s, &Self::ALL.map(Self::as_str)))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LegalDeposit => "legal_deposit",
            Self::Cataloging => "cataloging",
            Self::Cbm => "cbm",
            Self::Ged => "ged",
            Self::Payment => "payment",
            Self::Content => "content",
        }
    }
}

/// Kind of stage a step represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Creation,
    Validation,
    Correction,
    Archivage,
    Notification,
    Transmission,
    Verification,
}

impl StepType {
    pub const ALL: [StepType; 7] = [
        Self::Creation,
        Self::Validation,
        Self::Correction,
        Self::Archivage,
        Self::Notification,
        Self::Transmission,
        Self::Verification,
    ];

    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| invalid_tag("step_type", s, &Self::ALL.map(Self::as_str)))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Validation => "validation",
            Self::Correction => "correction",
            Self::Archivage => "archivage",
            Self::Notification => "notification",
            Self::Transmission => "transmission",
            Self::Verification => "verification",
        }
    }
}

/// What causes a transition to fire. Not interpreted by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Manual,
    Automatic,
    Conditional,
    #[serde(alias = "timer")]
    Scheduled,
}

impl TriggerType {
    pub const ALL: [TriggerType; 4] = [
        Self::Manual,
        Self::Automatic,
        Self::Conditional,
        Self::Scheduled,
    ];

    /// Parse a trigger type. `timer` is accepted as a legacy alias of
    /// `scheduled`.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        if s == "timer" {
            return Ok(Self::Scheduled);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| invalid_tag("trigger_type", s, &Self::ALL.map(Self::as_str)))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
            Self::Conditional => "conditional",
            Self::Scheduled => "scheduled",
        }
    }
}

/// Scope of a workflow role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleLevel {
    #[default]
    Module,
    System,
    Admin,
}

impl RoleLevel {
    pub const ALL: [RoleLevel; 3] = [Self::Module, Self::System, Self::Admin];

    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| invalid_tag("role_level", s, &Self::ALL.map(Self::as_str)))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::System => "system",
            Self::Admin => "admin",
        }
    }
}

fn invalid_tag(field: &str, value: &str, allowed: &[&str]) -> CoreError {
    CoreError::Validation(format!(
        "Invalid {field} '{value}'. Must be one of: {}",
        allowed.join(", ")
    ))
}

// ---------------------------------------------------------------------------
// Required-field validation
// ---------------------------------------------------------------------------

/// Validate a mandatory name-like field: non-blank and bounded in length.
///
/// Returns the trimmed value.
pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Normalize an optional free-text field: blank becomes `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate a caller-supplied definition version.
///
/// Versions start at 1 and may only move forward.
pub fn validate_version(current: i32, requested: i32) -> Result<(), CoreError> {
    if requested < INITIAL_VERSION {
        return Err(CoreError::Validation(format!(
            "version must be at least {INITIAL_VERSION}"
        )));
    }
    if requested < current {
        return Err(CoreError::Validation(format!(
            "version cannot decrease (current {current}, requested {requested})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Step numbering
// ---------------------------------------------------------------------------

/// Next step number for a definition given the highest number it has ever
/// been issued.
///
/// Numbers of deleted steps are never handed out again, so callers pass the
/// recorded high-water mark, not the maximum over the surviving steps.
pub fn next_step_number(highest_issued: Option<i32>) -> i32 {
    highest_issued.map_or(1, |max| max.max(0) + 1)
}

// ---------------------------------------------------------------------------
// Transition endpoints
// ---------------------------------------------------------------------------

/// A transition endpoint as submitted by a client: a step id, or the
/// `"none"` sentinel for the workflow boundary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StepRefInput {
    Id(DbId),
    Keyword(String),
}

impl StepRefInput {
    /// Resolve to the value persisted in the database (`None` = boundary).
    pub fn resolve(&self) -> Result<Option<DbId>, CoreError> {
        match self {
            Self::Id(id) => Ok(Some(*id)),
            Self::Keyword(k) if k == STEP_REF_NONE || k.is_empty() => Ok(None),
            Self::Keyword(k) => k.parse::<DbId>().map(Some).map_err(|_| {
                CoreError::Validation(format!(
                    "Invalid step reference '{k}'. Use a step id or '{STEP_REF_NONE}'"
                ))
            }),
        }
    }
}

/// Resolve an optional endpoint; absent and `null` both mean the boundary.
pub fn resolve_step_ref(input: Option<&StepRefInput>) -> Result<Option<DbId>, CoreError> {
    input.map_or(Ok(None), StepRefInput::resolve)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
