pub mod admin;
pub mod auth;
pub mod catalogue;
pub mod configurator;
pub mod contracts;
pub mod health;
pub mod landing;
pub mod leads;
pub mod notifications;
pub mod proposals;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket (?token=, header or cookie)
///
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout
/// /auth/me                              current user
/// /auth/forgot-password                 email an OTP (public)
/// /auth/reset-password                  OTP + new password (public)
///
/// /admin/users                          list, create (admin only)
/// /admin/users/{id}/deactivate          deactivate
/// /admin/vendors/...                    vendor CRUD, logo, teams
/// /admin/teams/{id}                     update, delete
/// /admin/teams/{id}/members             list, create
/// /admin/team-members/{id}              update, delete
///
/// /leads/...                            pipeline (staff), inquiry (public)
///
/// /proposals/...                        proposals (staff), public page data
/// /proposal-templates/...               proposal templates (staff)
/// /contract-templates/...               contract templates + render (staff)
///
/// /notifications/...                    bell (auth), create (admin)
///
/// /configurator/plans/...               wedding planner wizard (public)
/// /vibes/...                            vibe presets (public read)
/// /destinations/...                     destinations (public read)
/// /landing/sections/...                 landing page (public read)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/leads", leads::router())
        .nest("/proposals", proposals::router())
        .nest("/proposal-templates", proposals::template_router())
        .nest("/contract-templates", contracts::router())
        .nest("/notifications", notifications::router())
        .nest("/configurator", configurator::router())
        .nest("/vibes", catalogue::vibes_router())
        .nest("/destinations", catalogue::destinations_router())
        .nest("/landing", landing::router())
}
