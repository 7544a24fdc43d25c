//! Route definitions for the `/admin` resource.
//!
//! Every endpoint requires the admin role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                    -> list_users
/// POST   /users                    -> create_user
/// POST   /users/{id}/deactivate    -> deactivate_user
///
/// POST   /vendors/create           -> create_vendor
/// GET    /vendors/get-all          -> list_vendors
/// GET    /vendors/{id}             -> get_vendor
/// PUT    /vendors/{id}             -> update_vendor
/// DELETE /vendors/{id}             -> delete_vendor
/// POST   /vendors/{id}/logo        -> upload_vendor_logo
/// GET    /vendors/{id}/teams       -> list_teams
/// POST   /vendors/{id}/teams       -> create_team
///
/// PUT    /teams/{id}               -> update_team
/// DELETE /teams/{id}               -> delete_team
/// GET    /teams/{id}/members       -> list_members
/// POST   /teams/{id}/members       -> create_member
///
/// PUT    /team-members/{id}        -> update_member
/// DELETE /team-members/{id}        -> delete_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}/deactivate", post(admin::deactivate_user))
        // Vendors
        .route("/vendors/create", post(admin::create_vendor))
        .route("/vendors/get-all", get(admin::list_vendors))
        .route(
            "/vendors/{id}",
            get(admin::get_vendor)
                .put(admin::update_vendor)
                .delete(admin::delete_vendor),
        )
        .route("/vendors/{id}/logo", post(admin::upload_vendor_logo))
        .route(
            "/vendors/{id}/teams",
            get(admin::list_teams).post(admin::create_team),
        )
        // Teams
        .route(
            "/teams/{id}",
            put(admin::update_team).delete(admin::delete_team),
        )
        .route(
            "/teams/{id}/members",
            get(admin::list_members).post(admin::create_member),
        )
        .route(
            "/team-members/{id}",
            put(admin::update_member).delete(admin::delete_member),
        )
}
