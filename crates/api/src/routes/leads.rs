//! Route definitions for the `/leads` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// `/inquiry` is public (website form); everything else requires staff.
///
/// ```text
/// POST   /create        -> create
/// POST   /inquiry       -> inquiry
/// GET    /get-all       -> list
/// GET    /kanban        -> kanban
/// GET    /export        -> export (CSV)
/// PATCH  /bulk-status   -> bulk_update_status
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PATCH  /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(leads::create))
        .route("/inquiry", post(leads::inquiry))
        .route("/get-all", get(leads::list))
        .route("/kanban", get(leads::kanban))
        .route("/export", get(leads::export))
        .route("/bulk-status", patch(leads::bulk_update_status))
        .route(
            "/{id}",
            get(leads::get_by_id)
                .put(leads::update)
                .delete(leads::delete),
        )
        .route("/{id}/status", patch(leads::update_status))
}
