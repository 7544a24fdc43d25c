//! Route definitions for the `/landing` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::landing;
use crate::state::AppState;

/// Routes mounted at `/landing`.
///
/// ```text
/// GET /sections      -> list_sections (public)
/// GET /sections/{n}  -> get_section (public)
/// PUT /sections/{n}  -> update_section (admin, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sections", get(landing::list_sections))
        .route(
            "/sections/{n}",
            get(landing::get_section).put(landing::update_section),
        )
}
