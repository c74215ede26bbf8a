//! Wizard draft checkpoint model.

use serde::Serialize;
use sqlx::FromRow;
use bnadmin_core::types::{DbId, Timestamp};

/// A row from the `wizard_drafts` table.
///
/// `payload` is stored exactly as checkpointed; callers upgrade it from
/// `schema_version` when reading.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WizardDraft {
    pub id: DbId,
    pub wizard_key: String,
    pub schema_version: i32,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
