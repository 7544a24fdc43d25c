//! Route definitions for the public `/configurator` wizard.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::configurator;
use crate::state::AppState;

/// Routes mounted at `/configurator`.
///
/// ```text
/// POST /plans                      -> create_plan
/// GET  /plans/{public_id}          -> get_plan
/// PUT  /plans/{public_id}/step     -> save_step
/// PUT  /plans/{public_id}/autosave -> autosave
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", post(configurator::create_plan))
        .route("/plans/{public_id}", get(configurator::get_plan))
        .route("/plans/{public_id}/step", put(configurator::save_step))
        .route("/plans/{public_id}/autosave", put(configurator::autosave))
}
