//! Predefined role names per business module.
//!
//! The catalog is configuration data: a JSON object mapping a module tag
//! to the role names every workflow of that module may require. An
//! embedded default ships with the binary and can be replaced by a file.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::workflow::validate_required;

/// Catalog shipped with the binary.
pub const EMBEDDED_CATALOG_JSON: &str = include_str!("../data/role_catalog.json");

/// Module tag -> predefined role names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCatalog {
    modules: BTreeMap<String, Vec<String>>,
}

impl RoleCatalog {
    /// Parse and normalize a catalog document.
    ///
    /// Names are trimmed and deduplicated per module, keeping first
    /// occurrence order. Blank module tags or role names are rejected.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid role catalog: {e}")))?;

        let mut modules = BTreeMap::new();
        for (module, names) in raw {
            let module = validate_required("role catalog module", &module)?.to_string();
            let mut seen = HashSet::new();
            let mut cleaned = Vec::with_capacity(names.len());
            for name in &names {
                let name = validate_required("role catalog role_name", name)?;
                if seen.insert(name.to_string()) {
                    cleaned.push(name.to_string());
                }
            }
            modules.insert(module, cleaned);
        }
        Ok(Self { modules })
    }

    /// The catalog embedded at build time.
    pub fn embedded() -> Result<Self, CoreError> {
        Self::from_json(EMBEDDED_CATALOG_JSON)
    }

    /// Role names predefined for a module (empty for unknown modules).
    pub fn roles_for(&self, module: &str) -> &[String] {
        self.modules.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(module, role_name)` pairs in module order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules
            .iter()
            .flat_map(|(m, names)| names.iter().map(move |n| (m.as_str(), n.as_str())))
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Eligible role merge
// ---------------------------------------------------------------------------

/// Where an eligible role came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RoleSource {
    Stored { id: DbId },
    Catalog,
}

/// A role offered for selection in the cascading picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleRole {
    pub role_name: String,
    #[serde(flatten)]
    pub source: RoleSource,
}

/// Merge stored roles with catalog names, deduplicated by `role_name`.
///
/// Stored roles come first in the order given; catalog names already
/// present as stored rows are skipped.
pub fn merge_eligible_roles<'a>(
    stored: impl IntoIterator<Item = (DbId, &'a str)>,
    catalog_names: &[String],
) -> Vec<EligibleRole> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for (id, name) in stored {
        if seen.insert(name.trim().to_string()) {
            merged.push(EligibleRole {
                role_name: name.trim().to_string(),
                source: RoleSource::Stored { id },
            });
        }
    }
    for name in catalog_names {
        if seen.insert(name.clone()) {
            merged.push(EligibleRole {
                role_name: name.clone(),
                source: RoleSource::Catalog,
            });
        }
    }
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
