//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-based pagination parameters (`?page=&per_page=`).
///
/// Values are clamped by `bnadmin_core::pagination::PageWindow`.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Optional `?module=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleParams {
    pub module: Option<String>,
}

/// Turn a blank query value into `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
