//! Route definitions for steps addressed by id.

use axum::routing::get;
use axum::Router;

use crate::handlers::workflow_step;
use crate::state::AppState;

/// Routes mounted at `/workflow-steps`.
///
/// ```text
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete
/// GET    /{id}/transitions   -> list_outgoing
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(workflow_step::get_by_id)
                .put(workflow_step::update)
                .delete(workflow_step::delete),
        )
        .route("/{id}/transitions", get(workflow_step::list_outgoing))
}
