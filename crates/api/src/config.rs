use bnadmin_core::error::CoreError;
use bnadmin_core::role_catalog::RoleCatalog;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JSON file replacing the embedded role catalog, if set.
    pub role_catalog_path: Option<String>,
    /// Insert catalog roles missing from `workflow_roles` at startup.
    pub seed_role_catalog: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `ROLE_CATALOG_PATH`    | unset (embedded catalog)   |
    /// | `SEED_ROLE_CATALOG`    | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let role_catalog_path = std::env::var("ROLE_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let seed_role_catalog: bool = std::env::var("SEED_ROLE_CATALOG")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SEED_ROLE_CATALOG must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            role_catalog_path,
            seed_role_catalog,
        }
    }

    /// Load the role catalog from `role_catalog_path`, or the embedded one.
    pub fn load_role_catalog(&self) -> Result<RoleCatalog, CoreError> {
        match &self.role_catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    CoreError::Internal(format!("Cannot read role catalog '{path}': {e}"))
                })?;
                RoleCatalog::from_json(&json)
            }
            None => RoleCatalog::embedded(),
        }
    }
}
