//! Repository for the `workflow_roles` table.

use sqlx::PgPool;
use bnadmin_core::role_catalog::RoleCatalog;
use bnadmin_core::types::DbId;
use bnadmin_core::workflow::RoleLevel;

use crate::models::workflow_role::{CreateWorkflowRole, UpdateWorkflowRole, WorkflowRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, role_name, module, role_level, description, created_at, updated_at";

/// Provides CRUD operations for workflow roles.
pub struct WorkflowRoleRepo;

impl WorkflowRoleRepo {
    /// Insert a new role. `role_level` defaults to `module`.
    ///
    /// A duplicate `(module, role_name)` violates
    /// `uq_workflow_roles_module_role_name`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkflowRole,
    ) -> Result<WorkflowRole, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_roles (role_name, module, role_level, description) \
             VALUES ($1, $2, COALESCE($3, 'module'), $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRole>(&query)
            .bind(&input.role_name)
            .bind(&input.module)
            .bind(&input.role_level)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Insert a role unless one with the same module and name exists.
    ///
    /// Returns the new row, or `None` when it was already present.
    pub async fn insert_if_missing(
        pool: &PgPool,
        module: &str,
        role_name: &str,
        role_level: &str,
    ) -> Result<Option<WorkflowRole>, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_roles (role_name, module, role_level) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_workflow_roles_module_role_name DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRole>(&query)
            .bind(role_name)
            .bind(module)
            .bind(role_level)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkflowRole>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_roles WHERE id = $1");
        sqlx::query_as::<_, WorkflowRole>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List roles, optionally restricted to one module, ordered by module
    /// then name.
    pub async fn list(
        pool: &PgPool,
        module: Option<&str>,
    ) -> Result<Vec<WorkflowRole>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_roles \
             WHERE ($1::text IS NULL OR module = $1) \
             ORDER BY module, role_name"
        );
        sqlx::query_as::<_, WorkflowRole>(&query)
            .bind(module)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every field of a role.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflowRole,
    ) -> Result<Option<WorkflowRole>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_roles SET \
                role_name = $2, \
                module = $3, \
                role_level = COALESCE($4, 'module'), \
                description = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRole>(&query)
            .bind(id)
            .bind(&input.role_name)
            .bind(&input.module)
            .bind(&input.role_level)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role. Steps naming it in `required_role` are unaffected.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflow_roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert every catalog role missing from the table at `module` level.
    ///
    /// Returns only the rows that were inserted; running it twice inserts
    /// nothing the second time.
    pub async fn seed_catalog(
        pool: &PgPool,
        catalog: &RoleCatalog,
    ) -> Result<Vec<WorkflowRole>, sqlx::Error> {
        let mut inserted = Vec::new();
        for (module, role_name) in catalog.entries() {
            if let Some(role) =
                Self::insert_if_missing(pool, module, role_name, RoleLevel::Module.as_str()).await?
            {
                inserted.push(role);
            }
        }
        tracing::debug!(inserted = inserted.len(), catalog = catalog.len(), "Seeded role catalog");
        Ok(inserted)
    }
}
