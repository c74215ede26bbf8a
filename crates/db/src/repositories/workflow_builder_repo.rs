//! Writes a complete workflow built in the builder wizard.

use sqlx::{PgConnection, PgPool};
use bnadmin_core::builder_draft::SubmissionPlan;

use crate::models::workflow_definition::{CreateWorkflowDefinition, WorkflowDefinition};
use crate::models::workflow_step::{CreateWorkflowStep, WorkflowStep};
use crate::models::workflow_transition::{CreateWorkflowTransition, WorkflowTransition};
use crate::models::wizard_draft::WizardDraft;
use crate::repositories::{
    WizardDraftRepo, WorkflowDefinitionRepo, WorkflowStepRepo, WorkflowTransitionRepo,
};

/// Rows created from one builder submission.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MaterializedWorkflow {
    pub definition: WorkflowDefinition,
    pub steps: Vec<WorkflowStep>,
    pub transitions: Vec<WorkflowTransition>,
}

/// Inserts builder submissions atomically.
pub struct WorkflowBuilderRepo;

impl WorkflowBuilderRepo {
    /// Claim the draft stored under `wizard_key` and write the workflow
    /// planned from it.
    ///
    /// One transaction locks the key, reads the draft, inserts the
    /// definition, its steps and its transitions, and deletes the draft.
    /// Returns `Ok(None)` when no draft is stored, which is also what a
    /// concurrent submit of the same key sees once the first one commits.
    /// Nothing is written if `plan` or any insert fails.
    pub async fn materialize<F, E>(
        pool: &PgPool,
        wizard_key: &str,
        plan: F,
    ) -> Result<Option<MaterializedWorkflow>, E>
    where
        F: FnOnce(&WizardDraft) -> Result<SubmissionPlan, E>,
        E: From<sqlx::Error>,
    {
        let mut tx = pool.begin().await?;

        let Some(draft) = WizardDraftRepo::lock_by_key(&mut tx, wizard_key).await? else {
            return Ok(None);
        };
        let plan = plan(&draft)?;
        let created = Self::insert_plan(&mut tx, &plan).await?;
        WizardDraftRepo::delete_in(&mut *tx, wizard_key).await?;

        tx.commit().await?;
        Ok(Some(created))
    }

    /// Insert the definition, its steps and its transitions on `conn`.
    async fn insert_plan(
        conn: &mut PgConnection,
        plan: &SubmissionPlan,
    ) -> Result<MaterializedWorkflow, sqlx::Error> {
        let definition = WorkflowDefinitionRepo::create_in(
            &mut *conn,
            &CreateWorkflowDefinition {
                name: plan.definition.name.clone(),
                description: plan.definition.description.clone(),
                workflow_type: plan.definition.workflow_type.as_str().to_string(),
                module: plan.definition.module.clone(),
            },
        )
        .await?;

        let mut steps = Vec::with_capacity(plan.steps.len());
        for planned in &plan.steps {
            let step = WorkflowStepRepo::insert_numbered(
                &mut *conn,
                definition.id,
                planned.step_number,
                &CreateWorkflowStep {
                    step_name: planned.step_name.clone(),
                    step_type: planned.step_type.as_str().to_string(),
                    required_role: planned.required_role.clone(),
                },
            )
            .await?;
            steps.push(step);
        }

        let mut transitions = Vec::with_capacity(plan.transitions.len());
        for planned in &plan.transitions {
            let step_id = |index: Option<usize>| index.and_then(|i| steps.get(i)).map(|s| s.id);
            let transition = WorkflowTransitionRepo::create_in(
                &mut *conn,
                definition.id,
                &CreateWorkflowTransition {
                    transition_name: planned.transition_name.clone(),
                    from_step_id: step_id(planned.from_index),
                    to_step_id: step_id(planned.to_index),
                    trigger_type: planned.trigger_type.as_str().to_string(),
                },
            )
            .await?;
            transitions.push(transition);
        }

        Ok(MaterializedWorkflow {
            definition,
            steps,
            transitions,
        })
    }
}
