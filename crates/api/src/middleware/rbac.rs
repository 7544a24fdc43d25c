//! Role allow-list extractors.
//!
//! Each wraps [`AuthUser`]. A valid token with a role outside the list is
//! rejected with 403; a missing or bad token keeps its 401 from `AuthUser`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wedplan_core::error::CoreError;
use wedplan_core::roles::{ROLE_ADMIN, ROLE_TEAM_MEMBER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

const STAFF: &[&str] = &[ROLE_ADMIN, ROLE_TEAM_MEMBER];

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role.as_str()) {
        tracing::debug!(user_id = user.user_id, role = %user.role, "Role not allowed");
        return Err(CoreError::Forbidden(denied.to_string()).into());
    }
    Ok(user)
}

/// Admins only.
///
/// ```ignore
/// async fn purge(RequireAdmin(admin): RequireAdmin) -> AppResult<ApiResponse<()>> {
///     Ok(ApiResponse::message("ok"))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, &[ROLE_ADMIN], "Admin role required")
            .await
            .map(Self)
    }
}

/// Admins and team members: everyone who works leads and proposals.
/// Vendors get 403.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, STAFF, "Admin or Team Member role required")
            .await
            .map(Self)
    }
}

/// Any signed-in user.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        AuthUser::from_request_parts(parts, state).await.map(Self)
    }
}
