//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod wizard_draft_repo;
pub mod workflow_builder_repo;
pub mod workflow_definition_repo;
pub mod workflow_role_repo;
pub mod workflow_step_repo;
pub mod workflow_transition_repo;

pub use wizard_draft_repo::WizardDraftRepo;
pub use workflow_builder_repo::{MaterializedWorkflow, WorkflowBuilderRepo};
pub use workflow_definition_repo::WorkflowDefinitionRepo;
pub use workflow_role_repo::WorkflowRoleRepo;
pub use workflow_step_repo::WorkflowStepRepo;
pub use workflow_transition_repo::WorkflowTransitionRepo;
