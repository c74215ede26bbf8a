use std::sync::Arc;

use bnadmin_core::role_catalog::RoleCatalog;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bnadmin_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Predefined role names per module, loaded once at startup.
    pub role_catalog: Arc<RoleCatalog>,
}
