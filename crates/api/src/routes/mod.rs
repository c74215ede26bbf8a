pub mod health;
pub mod wizard_draft;
pub mod workflow_definition;
pub mod workflow_role;
pub mod workflow_step;
pub mod workflow_transition;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workflow-definitions                       list, create
/// /workflow-definitions/{id}                  get, update, delete (no cascade)
/// /workflow-definitions/{id}/toggle-active    flip is_active (POST)
/// /workflow-definitions/{id}/steps            list by step_number, create
/// /workflow-definitions/{id}/transitions      list with endpoint labels, create
/// /workflow-definitions/{id}/graph            steps, transitions, integrity report
///
/// /workflow-steps/{id}                        get, update, delete
/// /workflow-steps/{id}/transitions            transitions leaving the step
///
/// /workflow-transitions/{id}                  get, update, delete
///
/// /workflow-roles                             list (?module=), create
/// /workflow-roles/catalog                     predefined role names per module
/// /workflow-roles/seed                        insert missing catalog roles (POST)
/// /workflow-roles/{id}                        get, update, delete
///
/// /workflow-picker                            cascading selection and options
///
/// /wizard-drafts/{wizard_key}                 get (upgraded), checkpoint, discard
/// /wizard-drafts/{wizard_key}/actions         apply a builder action (POST)
/// /wizard-drafts/{wizard_key}/submit          build the workflow (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/workflow-definitions", workflow_definition::router())
        .nest("/workflow-steps", workflow_step::router())
        .nest("/workflow-transitions", workflow_transition::router())
        .nest("/workflow-roles", workflow_role::router())
        .route(
            "/workflow-picker",
            get(handlers::workflow_picker::picker),
        )
        .nest("/wizard-drafts", wizard_draft::router())
}
