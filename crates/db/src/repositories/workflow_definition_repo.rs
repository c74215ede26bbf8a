//! Repository for the `workflow_definitions` table.

use sqlx::PgPool;
use bnadmin_core::pagination::escape_like;
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::INITIAL_VERSION;

use crate::models::workflow_definition::{
    CreateWorkflowDefinition, UpdateWorkflowDefinition, WorkflowDefinition,
    WorkflowDefinitionFilter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, workflow_type, module, version, \
    is_active, configuration, created_at, updated_at";

/// Shared WHERE clause for list and count. `$1` module, `$2` workflow type,
/// `$3` search text escaped with [`escape_like`]; NULL parameters do not
/// filter.
const FILTER: &str = "($1::text IS NULL OR module = $1) \
    AND ($2::text IS NULL OR workflow_type = $2) \
    AND ($3::text IS NULL \
         OR name ILIKE '%' || $3 || '%' ESCAPE '\\' \
         OR description ILIKE '%' || $3 || '%' ESCAPE '\\')";

/// Provides CRUD operations for workflow definitions.
pub struct WorkflowDefinitionRepo;

impl WorkflowDefinitionRepo {
    /// Insert a new definition at version 1, active, with `{}` configuration.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkflowDefinition,
    ) -> Result<WorkflowDefinition, sqlx::Error> {
        Self::create_in(pool, input).await
    }

    /// Same as [`Self::create`] on any executor, for use inside a transaction.
    pub async fn create_in<'e, E>(
        executor: E,
        input: &CreateWorkflowDefinition,
    ) -> Result<WorkflowDefinition, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO workflow_definitions \
                (name, description, workflow_type, module, version, is_active, configuration) \
             VALUES ($1, $2, $3, $4, $5, true, '{{}}'::jsonb) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowDefinition>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.workflow_type)
            .bind(&input.module)
            .bind(INITIAL_VERSION)
            .fetch_one(executor)
            .await
    }

    /// Find a definition by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowDefinition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_definitions WHERE id = $1");
        sqlx::query_as::<_, WorkflowDefinition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List definitions matching `filter`, most recently updated first.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkflowDefinitionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkflowDefinition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_definitions \
             WHERE {FILTER} \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, WorkflowDefinition>(&query)
            .bind(&filter.module)
            .bind(&filter.workflow_type)
            .bind(filter.search.as_deref().map(escape_like))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count definitions matching `filter`.
    pub async fn count(
        pool: &PgPool,
        filter: &WorkflowDefinitionFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM workflow_definitions WHERE {FILTER}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(&filter.module)
            .bind(&filter.workflow_type)
            .bind(filter.search.as_deref().map(escape_like))
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// List every definition ordered by name, for selection lists.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<WorkflowDefinition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_definitions ORDER BY name, id");
        sqlx::query_as::<_, WorkflowDefinition>(&query)
            .fetch_all(pool)
            .await
    }

    /// Overwrite name, description, workflow type and module. Version and
    /// configuration keep their stored values when `None`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflowDefinition,
    ) -> Result<Option<WorkflowDefinition>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_definitions SET \
                name = $2, \
                description = $3, \
                workflow_type = $4, \
                module = $5, \
                version = COALESCE($6, version), \
                configuration = COALESCE($7, configuration) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowDefinition>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.workflow_type)
            .bind(&input.module)
            .bind(input.version)
            .bind(&input.configuration)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_active`, returning the updated row.
    pub async fn toggle_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowDefinition>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_definitions SET is_active = NOT is_active \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowDefinition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a definition. Its steps and transitions are left in
    /// place. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_definitions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
