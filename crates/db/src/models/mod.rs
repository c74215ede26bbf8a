//! Row structs and DTOs, one module per table.

pub mod wizard_draft;
pub mod workflow_definition;
pub mod workflow_role;
pub mod workflow_step;
pub mod workflow_transition;
