//! Repository for the `workflow_steps` table.

use sqlx::{PgConnection, PgPool};
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::next_step_number;

use crate::models::workflow_step::{CreateWorkflowStep, UpdateWorkflowStep, WorkflowStep};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workflow_id, step_name, step_type, step_number, \
    required_role, created_at, updated_at";

/// Provides CRUD operations for workflow steps.
pub struct WorkflowStepRepo;

impl WorkflowStepRepo {
    /// Insert a step numbered one past the highest number the definition
    /// has ever been issued.
    ///
    /// The high-water mark is read, the row inserted and the mark advanced
    /// inside one transaction holding an advisory lock on `workflow_id`, so
    /// concurrent creators for the same definition get distinct numbers and
    /// numbers freed by deletes are never reused.
    pub async fn create(
        pool: &PgPool,
        workflow_id: DbId,
        input: &CreateWorkflowStep,
    ) -> Result<WorkflowStep, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(workflow_id)
            .execute(&mut *tx)
            .await?;

        let highest = Self::highest_issued(&mut tx, workflow_id).await?;
        let step_number = next_step_number(highest);
        let step = Self::insert_numbered(&mut tx, workflow_id, step_number, input).await?;

        tx.commit().await?;
        tracing::debug!(workflow_id, step_number, "Assigned step number");
        Ok(step)
    }

    /// Highest step number ever issued to a definition: the recorded
    /// high-water mark or the largest surviving number, whichever is
    /// greater.
    pub async fn highest_issued(
        conn: &mut PgConnection,
        workflow_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT GREATEST( \
                (SELECT last_step_number FROM workflow_step_counters WHERE workflow_id = $1), \
                (SELECT MAX(step_number) FROM workflow_steps WHERE workflow_id = $1))",
        )
        .bind(workflow_id)
        .fetch_one(conn)
        .await
    }

    /// Insert a step with an explicit number and advance the definition's
    /// high-water mark to it. Callers own numbering.
    pub async fn insert_numbered(
        conn: &mut PgConnection,
        workflow_id: DbId,
        step_number: i32,
        input: &CreateWorkflowStep,
    ) -> Result<WorkflowStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_steps \
                (workflow_id, step_name, step_type, step_number, required_role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let step = sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(workflow_id)
            .bind(&input.step_name)
            .bind(&input.step_type)
            .bind(step_number)
            .bind(&input.required_role)
            .fetch_one(&mut *conn)
            .await?;

        sqlx::query(
            "INSERT INTO workflow_step_counters (workflow_id, last_step_number) \
             VALUES ($1, $2) \
             ON CONFLICT (workflow_id) DO UPDATE SET \
                last_step_number = GREATEST( \
                    workflow_step_counters.last_step_number, \
                    EXCLUDED.last_step_number)",
        )
        .bind(workflow_id)
        .bind(step_number)
        .execute(&mut *conn)
        .await?;

        Ok(step)
    }

    /// Find a step by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkflowStep>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_steps WHERE id = $1");
        sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a definition's steps ordered by step number ascending.
    pub async fn list_by_workflow(
        pool: &PgPool,
        workflow_id: DbId,
    ) -> Result<Vec<WorkflowStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_steps \
             WHERE workflow_id = $1 \
             ORDER BY step_number ASC, id ASC"
        );
        sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(workflow_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite name, type and required role. The step number is untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflowStep,
    ) -> Result<Option<WorkflowStep>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_steps SET \
                step_name = $2, \
                step_type = $3, \
                required_role = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(id)
            .bind(&input.step_name)
            .bind(&input.step_type)
            .bind(&input.required_role)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a step. Transitions referencing it are left dangling.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_steps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
