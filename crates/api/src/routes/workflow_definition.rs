//! Route definitions for workflow definitions and their steps and
//! transitions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{workflow_definition, workflow_step, workflow_transition};
use crate::state::AppState;

/// Routes mounted at `/workflow-definitions`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update
/// DELETE /{id}                 -> delete
/// POST   /{id}/toggle-active   -> toggle_active
/// GET    /{id}/graph           -> graph
/// GET    /{id}/steps           -> workflow_step::list_by_definition
/// POST   /{id}/steps           -> workflow_step::create
/// GET    /{id}/transitions     -> workflow_transition::list_by_definition
/// POST   /{id}/transitions     -> workflow_transition::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workflow_definition::list).post(workflow_definition::create),
        )
        .route(
            "/{id}",
            get(workflow_definition::get_by_id)
                .put(workflow_definition::update)
                .delete(workflow_definition::delete),
        )
        .route(
            "/{id}/toggle-active",
            post(workflow_definition::toggle_active),
        )
        .route("/{id}/graph", get(workflow_definition::graph))
        .route(
            "/{id}/steps",
            get(workflow_step::list_by_definition).post(workflow_step::create),
        )
        .route(
            "/{id}/transitions",
            get(workflow_transition::list_by_definition).post(workflow_transition::create),
        )
}
