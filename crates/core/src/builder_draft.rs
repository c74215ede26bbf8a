//! Workflow builder wizard drafts.
//!
//! The builder collects a definition, its ordered steps and the
//! transitions between them over four stages before anything is written
//! to the database. The draft is a plain serializable value changed only
//! through [`apply`], checkpointed by the API under a wizard key, and
//! upgraded through [`load`] when an older schema version is read back.
//!
//! Steps inside a draft are addressed by a client-chosen `key` because
//! they have no database id yet; transitions reference those keys, or
//! `None` for the workflow start/end.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::workflow::{
    normalize_optional, validate_required, StepType, TriggerType, WorkflowType, STEP_REF_NONE,
};

/// Schema version written with every checkpoint.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Oldest schema version [`load`] can upgrade.
pub const MIN_SCHEMA_VERSION: i32 = 1;

/// Maximum number of steps a single draft may hold.
pub const MAX_DRAFT_STEPS: usize = 100;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// The four builder stages, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderStage {
    #[default]
    Definition,
    Steps,
    Transitions,
    Review,
}

impl BuilderStage {
    /// Convert a 1-based stage number.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Definition),
            2 => Ok(Self::Steps),
            3 => Ok(Self::Transitions),
            4 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid builder stage {n}. Must be between 1 and 4"
            ))),
        }
    }

    pub fn to_number(self) -> u8 {
        match self {
            Self::Definition => 1,
            Self::Steps => 2,
            Self::Transitions => 3,
            Self::Review => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Draft shape (schema v2)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workflow_type: Option<WorkflowType>,
    #[serde(default)]
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStep {
    pub key: String,
    pub step_name: String,
    pub step_type: StepType,
    #[serde(default)]
    pub required_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTransition {
    pub transition_name: String,
    /// Key of the source step; `None` means the workflow start.
    #[serde(default)]
    pub from_key: Option<String>,
    /// Key of the target step; `None` means the workflow end.
    #[serde(default)]
    pub to_key: Option<String>,
    #[serde(default = "default_trigger")]
    pub trigger_type: TriggerType,
}

fn default_trigger() -> TriggerType {
    TriggerType::Manual
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderDraft {
    #[serde(default)]
    pub definition: DraftDefinition,
    #[serde(default)]
    pub steps: Vec<DraftStep>,
    #[serde(default)]
    pub transitions: Vec<DraftTransition>,
    #[serde(default)]
    pub stage: BuilderStage,
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Every change a client can make to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuilderAction {
    SetDefinition { definition: DraftDefinition },
    AddStep { step: DraftStep },
    UpdateStep { key: String, step: DraftStep },
    /// Removes the step and every draft transition that references it.
    RemoveStep { key: String },
    MoveStep { key: String, to_index: usize },
    AddTransition { transition: DraftTransition },
    UpdateTransition { index: usize, transition: DraftTransition },
    RemoveTransition { index: usize },
    GoToStage { stage: BuilderStage },
    Reset,
}

/// Apply one action, returning the next draft.
///
/// The input draft is left untouched when the action is rejected.
pub fn apply(draft: &BuilderDraft, action: BuilderAction) -> Result<BuilderDraft, CoreError> {
    let mut next = draft.clone();
    match action {
        BuilderAction::SetDefinition { definition } => {
            next.definition = definition;
        }
        BuilderAction::AddStep { mut step } => {
            step.key = validate_step_key(&step.key)?;
            if next.steps.len() >= MAX_DRAFT_STEPS {
                return Err(CoreError::Validation(format!(
                    "A draft may hold at most {MAX_DRAFT_STEPS} steps"
                )));
            }
            if next.steps.iter().any(|s| s.key == step.key) {
                return Err(CoreError::Conflict(format!(
                    "Step key '{}' already exists in this draft",
                    step.key
                )));
            }
            next.steps.push(step);
        }
        BuilderAction::UpdateStep { key, mut step } => {
            let pos = step_position(&next, &key)?;
            step.key = validate_step_key(&step.key)?;
            if step.key != key {
                if next.steps.iter().any(|s| s.key == step.key) {
                    return Err(CoreError::Conflict(format!(
                        "Step key '{}' already exists in this draft",
                        step.key
                    )));
                }
                for t in &mut next.transitions {
                    rekey(&mut t.from_key, &key, &step.key);
                    rekey(&mut t.to_key, &key, &step.key);
                }
            }
            next.steps[pos] = step;
        }
        BuilderAction::RemoveStep { key } => {
            let pos = step_position(&next, &key)?;
            next.steps.remove(pos);
            next.transitions.retain(|t| {
                t.from_key.as_deref() != Some(key.as_str()) && t.to_key.as_deref() != Some(key.as_str())
            });
        }
        BuilderAction::MoveStep { key, to_index } => {
            let pos = step_position(&next, &key)?;
            let step = next.steps.remove(pos);
            let to_index = to_index.min(next.steps.len());
            next.steps.insert(to_index, step);
        }
        BuilderAction::AddTransition { transition } => {
            next.transitions.push(transition);
        }
        BuilderAction::UpdateTransition { index, transition } => {
            let slot = next
                .transitions
                .get_mut(index)
                .ok_or_else(|| transition_index_error(index))?;
            *slot = transition;
        }
        BuilderAction::RemoveTransition { index } => {
            if index >= next.transitions.len() {
                return Err(transition_index_error(index));
            }
            next.transitions.remove(index);
        }
        BuilderAction::GoToStage { stage } => {
            validate_stage_move(&next, stage)?;
            next.stage = stage;
        }
        BuilderAction::Reset => {
            next = BuilderDraft::default();
        }
    }
    Ok(next)
}

fn rekey(slot: &mut Option<String>, old: &str, new: &str) {
    if slot.as_deref() == Some(old) {
        *slot = Some(new.to_string());
    }
}

fn step_position(draft: &BuilderDraft, key: &str) -> Result<usize, CoreError> {
    draft
        .steps
        .iter()
        .position(|s| s.key == key)
        .ok_or_else(|| CoreError::Validation(format!("Unknown step key '{key}'")))
}

fn transition_index_error(index: usize) -> CoreError {
    CoreError::Validation(format!("No draft transition at index {index}"))
}

/// Returns the trimmed key.
fn validate_step_key(key: &str) -> Result<String, CoreError> {
    let key = validate_required("step key", key)?;
    if key == STEP_REF_NONE {
        return Err(CoreError::Validation(format!(
            "'{STEP_REF_NONE}' is reserved and cannot be used as a step key"
        )));
    }
    Ok(key.to_string())
}

// ---------------------------------------------------------------------------
// Stage validation
// ---------------------------------------------------------------------------

/// Moving back is always allowed; moving forward is allowed one stage at
/// a time once the current stage is complete.
pub fn validate_stage_move(draft: &BuilderDraft, target: BuilderStage) -> Result<(), CoreError> {
    let current = draft.stage.to_number();
    let next = target.to_number();
    if next <= current {
        return Ok(());
    }
    if next != current + 1 {
        return Err(CoreError::Validation(format!(
            "Cannot jump from stage {current} to stage {next}. Advance one stage at a time."
        )));
    }
    validate_stage(draft, draft.stage)
}

/// Check that the data collected by `stage` is complete.
pub fn validate_stage(draft: &BuilderDraft, stage: BuilderStage) -> Result<(), CoreError> {
    match stage {
        BuilderStage::Definition => {
            let d = &draft.definition;
            validate_required("name", &d.name)?;
            validate_required("module", &d.module)?;
            if d.workflow_type.is_none() {
                return Err(CoreError::Validation("workflow_type is required".to_string()));
            }
        }
        BuilderStage::Steps => {
            if draft.steps.is_empty() {
                return Err(CoreError::Validation(
                    "At least one step is required".to_string(),
                ));
            }
            for s in &draft.steps {
                validate_step_key(&s.key)?;
                validate_required("step_name", &s.step_name)?;
            }
        }
        BuilderStage::Transitions => {
            for t in &draft.transitions {
                validate_required("transition_name", &t.transition_name)?;
                for key in [&t.from_key, &t.to_key].into_iter().flatten() {
                    step_position(draft, key)?;
                }
            }
        }
        BuilderStage::Review => {
            validate_stage(draft, BuilderStage::Definition)?;
            validate_stage(draft, BuilderStage::Steps)?;
            validate_stage(draft, BuilderStage::Transitions)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Submission plan
// ---------------------------------------------------------------------------

/// Definition fields ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDefinition {
    pub name: String,
    pub description: Option<String>,
    pub workflow_type: WorkflowType,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step_number: i32,
    pub step_name: String,
    pub step_type: StepType,
    pub required_role: Option<String>,
}

/// A transition whose endpoints are indexes into [`SubmissionPlan::steps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTransition {
    pub transition_name: String,
    pub from_index: Option<usize>,
    pub to_index: Option<usize>,
    pub trigger_type: TriggerType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub definition: PlannedDefinition,
    pub steps: Vec<PlannedStep>,
    pub transitions: Vec<PlannedTransition>,
}

/// Validate a draft end to end and turn it into rows to insert.
///
/// Steps are numbered 1..n in draft order.
pub fn plan_submission(draft: &BuilderDraft) -> Result<SubmissionPlan, CoreError> {
    validate_stage(draft, BuilderStage::Review)?;

    let d = &draft.definition;
    let definition = PlannedDefinition {
        name: validate_required("name", &d.name)?.to_string(),
        description: normalize_optional(d.description.as_deref()),
        workflow_type: d
            .workflow_type
            .ok_or_else(|| CoreError::Validation("workflow_type is required".to_string()))?,
        module: validate_required("module", &d.module)?.to_string(),
    };

    let steps = draft
        .steps
        .iter()
        .zip(1..)
        .map(|(s, number)| PlannedStep {
            step_number: number,
            step_name: s.step_name.trim().to_string(),
            step_type: s.step_type,
            required_role: normalize_optional(s.required_role.as_deref()),
        })
        .collect();

    let transitions = draft
        .transitions
        .iter()
        .map(|t| {
            let index_of = |key: &Option<String>| -> Result<Option<usize>, CoreError> {
                key.as_deref()
                    .map(|k| step_position(draft, k))
                    .transpose()
            };
            Ok(PlannedTransition {
                transition_name: t.transition_name.trim().to_string(),
                from_index: index_of(&t.from_key)?,
                to_index: index_of(&t.to_key)?,
                trigger_type: t.trigger_type,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(SubmissionPlan {
        definition,
        steps,
        transitions,
    })
}

// ---------------------------------------------------------------------------
// Schema upgrades
// ---------------------------------------------------------------------------

/// Schema v1: flat definition fields, unkeyed steps, and transitions that
/// reference steps by position (`null` or `"none"` for the boundary).
#[derive(Debug, Deserialize)]
struct DraftV1 {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    workflow_type: Option<WorkflowType>,
    #[serde(default)]
    module: String,
    #[serde(default)]
    steps: Vec<StepV1>,
    #[serde(default)]
    transitions: Vec<TransitionV1>,
    #[serde(default = "first_stage")]
    current_step: u8,
}

fn first_stage() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
struct StepV1 {
    step_name: String,
    step_type: StepType,
    #[serde(default)]
    required_role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransitionV1 {
    transition_name: String,
    #[serde(default)]
    from_step: Option<serde_json::Value>,
    #[serde(default)]
    to_step: Option<serde_json::Value>,
    #[serde(default = "default_trigger")]
    trigger_type: TriggerType,
}

/// Key assigned to the v1 step at `index`.
fn v1_step_key(index: usize) -> String {
    format!("step-{}", index + 1)
}

fn v1_endpoint(value: Option<&serde_json::Value>, step_count: usize) -> Result<Option<String>, CoreError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s == STEP_REF_NONE => Ok(None),
        Some(v) => {
            let index = v
                .as_u64()
                .map(|i| i as usize)
                .filter(|i| *i < step_count)
                .ok_or_else(|| {
                    CoreError::Validation(format!("Draft v1 transition endpoint {v} is invalid"))
                })?;
            Ok(Some(v1_step_key(index)))
        }
    }
}

fn upgrade_v1_to_v2(payload: serde_json::Value) -> Result<serde_json::Value, CoreError> {
    let v1: DraftV1 = serde_json::from_value(payload)
        .map_err(|e| CoreError::Validation(format!("Unreadable v1 draft: {e}")))?;
    let step_count = v1.steps.len();

    let transitions = v1
        .transitions
        .into_iter()
        .map(|t| {
            Ok(DraftTransition {
                transition_name: t.transition_name,
                from_key: v1_endpoint(t.from_step.as_ref(), step_count)?,
                to_key: v1_endpoint(t.to_step.as_ref(), step_count)?,
                trigger_type: t.trigger_type,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let draft = BuilderDraft {
        definition: DraftDefinition {
            name: v1.name,
            description: v1.description,
            workflow_type: v1.workflow_type,
            module: v1.module,
        },
        steps: v1
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, s)| DraftStep {
                key: v1_step_key(i),
                step_name: s.step_name,
                step_type: s.step_type,
                required_role: s.required_role,
            })
            .collect(),
        transitions,
        stage: BuilderStage::from_number(v1.current_step).unwrap_or_default(),
    };

    serde_json::to_value(draft).map_err(|e| CoreError::Internal(e.to_string()))
}

/// Upgrade a stored payload from `schema_version` to the current schema.
pub fn upgrade(schema_version: i32, payload: serde_json::Value) -> Result<serde_json::Value, CoreError> {
    if schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Validation(format!(
            "Draft schema version {schema_version} is newer than supported version {CURRENT_SCHEMA_VERSION}"
        )));
    }
    if schema_version < MIN_SCHEMA_VERSION {
        return Err(CoreError::Validation(format!(
            "Draft schema version {schema_version} is not supported"
        )));
    }

    let mut version = schema_version;
    let mut payload = payload;
    while version < CURRENT_SCHEMA_VERSION {
        payload = match version {
            1 => upgrade_v1_to_v2(payload)?,
            other => {
                return Err(CoreError::Internal(format!(
                    "No upgrade registered for draft schema version {other}"
                )))
            }
        };
        version += 1;
    }
    Ok(payload)
}

/// Read a stored draft at any supported schema version.
pub fn load(schema_version: i32, payload: serde_json::Value) -> Result<BuilderDraft, CoreError> {
    let upgraded = upgrade(schema_version, payload)?;
    serde_json::from_value(upgraded)
        .map_err(|e| CoreError::Validation(format!("Unreadable draft: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
