//! Route definitions for `/proposals` and `/proposal-templates`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{proposals, templates};
use crate::state::AppState;

/// Routes mounted at `/proposals`.
///
/// ```text
/// POST  /create              -> create
/// GET   /get-all             -> list (?lead_id=)
/// GET   /public/{reference}  -> get_public (no auth)
/// GET   /{id}                -> get_by_id
/// PUT   /{id}                -> update (draft only)
/// POST  /{id}/send           -> send (render, email, mark sent)
/// PATCH /{id}/status         -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(proposals::create))
        .route("/get-all", get(proposals::list))
        .route("/public/{reference}", get(proposals::get_public))
        .route("/{id}", get(proposals::get_by_id).put(proposals::update))
        .route("/{id}/send", post(proposals::send))
        .route("/{id}/status", patch(proposals::update_status))
}

/// Routes mounted at `/proposal-templates`.
pub fn template_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(templates::create_proposal_template))
        .route("/get-all", get(templates::list_proposal_templates))
        .route(
            "/{id}",
            get(templates::get_proposal_template)
                .put(templates::update_proposal_template)
                .delete(templates::delete_proposal_template),
        )
}
