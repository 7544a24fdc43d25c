//! Route definitions for the `/contract-templates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/contract-templates`.
///
/// ```text
/// POST   /create       -> create_contract_template
/// GET    /get-all      -> list_contract_templates
/// GET    /{id}         -> get_contract_template
/// PUT    /{id}         -> update_contract_template
/// DELETE /{id}         -> delete_contract_template (admin)
/// POST   /{id}/render  -> render_contract_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(templates::create_contract_template))
        .route("/get-all", get(templates::list_contract_templates))
        .route(
            "/{id}",
            get(templates::get_contract_template)
                .put(templates::update_contract_template)
                .delete(templates::delete_contract_template),
        )
        .route("/{id}/render", post(templates::render_contract_template))
}
