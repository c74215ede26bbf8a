//! Repository for the `wizard_drafts` table.

use sqlx::{PgConnection, PgPool};

use crate::models::wizard_draft::WizardDraft;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, wizard_key, schema_version, payload, created_at, updated_at";

/// Advisory lock class for wizard keys. The two-key lock space never
/// overlaps the single-key locks taken on `workflow_id` for step numbering.
const WIZARD_KEY_LOCK_CLASS: i32 = 1;

/// Provides checkpoint storage for wizard drafts.
pub struct WizardDraftRepo;

impl WizardDraftRepo {
    /// Find the draft stored under a wizard key.
    pub async fn find_by_key(
        pool: &PgPool,
        wizard_key: &str,
    ) -> Result<Option<WizardDraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizard_drafts WHERE wizard_key = $1");
        sqlx::query_as::<_, WizardDraft>(&query)
            .bind(wizard_key)
            .fetch_optional(pool)
            .await
    }

    /// Lock `wizard_key` until the surrounding transaction ends, then read
    /// its draft.
    ///
    /// The lock is taken on the key itself, so it also serializes callers
    /// for a key that has no draft yet. The read happens after the lock is
    /// granted and sees every commit made by the previous holder.
    pub async fn lock_by_key(
        conn: &mut PgConnection,
        wizard_key: &str,
    ) -> Result<Option<WizardDraft>, sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, hashtext($2))")
            .bind(WIZARD_KEY_LOCK_CLASS)
            .bind(wizard_key)
            .execute(&mut *conn)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM wizard_drafts WHERE wizard_key = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, WizardDraft>(&query)
            .bind(wizard_key)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Write a checkpoint, replacing any previous one for the key.
    pub async fn upsert(
        pool: &PgPool,
        wizard_key: &str,
        schema_version: i32,
        payload: &serde_json::Value,
    ) -> Result<WizardDraft, sqlx::Error> {
        Self::upsert_in(pool, wizard_key, schema_version, payload).await
    }

    /// Same as [`Self::upsert`] on any executor, for use inside a transaction.
    pub async fn upsert_in<'e, E>(
        executor: E,
        wizard_key: &str,
        schema_version: i32,
        payload: &serde_json::Value,
    ) -> Result<WizardDraft, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO wizard_drafts (wizard_key, schema_version, payload) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_wizard_drafts_wizard_key DO UPDATE SET \
                schema_version = EXCLUDED.schema_version, \
                payload = EXCLUDED.payload \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardDraft>(&query)
            .bind(wizard_key)
            .bind(schema_version)
            .bind(payload)
            .fetch_one(executor)
            .await
    }

    /// Read-modify-write the draft under `wizard_key` while holding its lock.
    ///
    /// `modify` receives the stored row (`None` for a new key) and returns
    /// the payload to store at `schema_version`. When `modify` fails the
    /// transaction is rolled back and the stored draft is left unchanged.
    pub async fn modify<F, E>(
        pool: &PgPool,
        wizard_key: &str,
        schema_version: i32,
        modify: F,
    ) -> Result<WizardDraft, E>
    where
        F: FnOnce(Option<WizardDraft>) -> Result<serde_json::Value, E>,
        E: From<sqlx::Error>,
    {
        let mut tx = pool.begin().await?;
        let current = Self::lock_by_key(&mut tx, wizard_key).await?;
        let payload = modify(current)?;
        let row = Self::upsert_in(&mut *tx, wizard_key, schema_version, &payload).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Discard the draft for a key. Returns `true` if a row was deleted.
    pub async fn delete_by_key(pool: &PgPool, wizard_key: &str) -> Result<bool, sqlx::Error> {
        Self::delete_in(pool, wizard_key).await
    }

    /// Same as [`Self::delete_by_key`] on any executor.
    pub async fn delete_in<'e, E>(executor: E, wizard_key: &str) -> Result<bool, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM wizard_drafts WHERE wizard_key = $1")
            .bind(wizard_key)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
