use axum::routing::get;
use axum::Router;

use crate::handlers::workflow_transition;
use crate::state::AppState;

/// Routes mounted at `/workflow-transitions`.
///
/// ```text
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(workflow_transition::get_by_id)
            .put(workflow_transition::update)
            .delete(workflow_transition::delete),
    )
}
