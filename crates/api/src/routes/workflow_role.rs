//! Route definitions for workflow roles and the role catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workflow_role;
use crate::state::AppState;

/// Routes mounted at `/workflow-roles`.
///
/// ```text
/// GET    /           -> list (?module=)
/// POST   /           -> create
/// GET    /catalog    -> catalog
/// POST   /seed       -> seed
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workflow_role::list).post(workflow_role::create))
        .route("/catalog", get(workflow_role::catalog))
        .route("/seed", post(workflow_role::seed))
        .route(
            "/{id}",
            get(workflow_role::get_by_id)
                .put(workflow_role::update)
                .delete(workflow_role::delete),
        )
}
