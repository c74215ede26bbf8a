//! Repository for the `workflow_transitions` table.

use sqlx::PgPool;
use bnadmin_core::types::DbId;

use crate::models::workflow_transition::{
    CreateWorkflowTransition, UpdateWorkflowTransition, WorkflowTransition,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workflow_id, transition_name, from_step_id, to_step_id, \
    trigger_type, created_at, updated_at";

/// Provides CRUD operations for workflow transitions.
pub struct WorkflowTransitionRepo;

impl WorkflowTransitionRepo {
    /// Insert a transition. Endpoints are stored as given, without checking
    /// that the steps exist or belong to `workflow_id`.
    pub async fn create(
        pool: &PgPool,
        workflow_id: DbId,
        input: &CreateWorkflowTransition,
    ) -> Result<WorkflowTransition, sqlx::Error> {
        Self::create_in(pool, workflow_id, input).await
    }

    /// Same as [`Self::create`] on any executor, for use inside a transaction.
    pub async fn create_in<'e, E>(
        executor: E,
        workflow_id: DbId,
        input: &CreateWorkflowTransition,
    ) -> Result<WorkflowTransition, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO workflow_transitions \
                (workflow_id, transition_name, from_step_id, to_step_id, trigger_type) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(workflow_id)
            .bind(&input.transition_name)
            .bind(input.from_step_id)
            .bind(input.to_step_id)
            .bind(&input.trigger_type)
            .fetch_one(executor)
            .await
    }

    /// Find a transition by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowTransition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_transitions WHERE id = $1");
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every transition of a definition, in insertion order.
    pub async fn list_by_workflow(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_transitions WHERE workflow_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(workflow_id)
            .fetch_all(pool)
            .await
    }

    /// List transitions leaving a step.
    pub async fn list_from_step(
        pool: &PgPool,
        step_id: DbId,
    ) -> Result<Vec<WorkflowTransition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_transitions WHERE from_step_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(step_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every field of a transition except its definition.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflowTransition,
    ) -> Result<Option<WorkflowTransition>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_transitions SET \
                transition_name = $2, \
                from_step_id = $3, \
                to_step_id = $4, \
                trigger_type = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowTransition>(&query)
            .bind(id)
            .bind(&input.transition_name)
            .bind(input.from_step_id)
            .bind(input.to_step_id)
            .bind(&input.trigger_type)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a transition. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_transitions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
