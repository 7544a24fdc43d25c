//! Route definitions for `/vibes` and `/destinations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::catalogue;
use crate::state::AppState;

/// Routes mounted at `/vibes`.
///
/// ```text
/// GET    /get-all      -> list_vibes (public, active only)
/// GET    /manage       -> manage_vibes (admin, ?include_inactive=)
/// POST   /create       -> create_vibe
/// GET    /{id}         -> get_vibe (public)
/// PUT    /{id}         -> update_vibe
/// DELETE /{id}         -> delete_vibe
/// POST   /{id}/image   -> upload_vibe_image
/// ```
pub fn vibes_router() -> Router<AppState> {
    Router::new()
        .route("/get-all", get(catalogue::list_vibes))
        .route("/manage", get(catalogue::manage_vibes))
        .route("/create", post(catalogue::create_vibe))
        .route(
            "/{id}",
            get(catalogue::get_vibe)
                .put(catalogue::update_vibe)
                .delete(catalogue::delete_vibe),
        )
        .route("/{id}/image", post(catalogue::upload_vibe_image))
}

/// Routes mounted at `/destinations`. Same shape as `/vibes`.
pub fn destinations_router() -> Router<AppState> {
    Router::new()
        .route("/get-all", get(catalogue::list_destinations))
        .route("/manage", get(catalogue::manage_destinations))
        .route("/create", post(catalogue::create_destination))
        .route(
            "/{id}",
            get(catalogue::get_destination)
                .put(catalogue::update_destination)
                .delete(catalogue::delete_destination),
        )
        .route("/{id}/image", post(catalogue::upload_destination_image))
}
