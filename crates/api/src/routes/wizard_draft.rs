//! Route definitions for builder wizard drafts.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wizard_draft;
use crate::state::AppState;

/// Routes mounted at `/wizard-drafts`.
///
/// ```text
/// GET    /{wizard_key}           -> get_draft
/// PUT    /{wizard_key}           -> put_draft
/// DELETE /{wizard_key}           -> delete_draft
/// POST   /{wizard_key}/actions   -> apply_action
/// POST   /{wizard_key}/submit    -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{wizard_key}",
            get(wizard_draft::get_draft)
                .put(wizard_draft::put_draft)
                .delete(wizard_draft::delete_draft),
        )
        .route("/{wizard_key}/actions", post(wizard_draft::apply_action))
        .route("/{wizard_key}/submit", post(wizard_draft::submit))
}
