//! Handlers for the `/notifications` resource.
//!
//! A user sees notifications addressed to their id or to their role.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use wedplan_core::error::CoreError;
use wedplan_core::notification::{
    is_visible_to, validate_content, NotificationTarget, Viewer,
};
use wedplan_core::types::DbId;
use wedplan_db::models::notification::{CreateNotification, Notification};
use wedplan_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::notifications::notify;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    /// Defaults to `true`: the bell shows unread items only.
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl NotificationListParams {
    fn page(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

fn viewer(user: &AuthUser) -> Viewer<'_> {
    Viewer {
        user_id: user.user_id,
        role: &user.role,
    }
}

/// GET /api/v1/notifications
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    let page = params.page();
    let notifications = NotificationRepo::list_visible(
        &state.pool,
        user.user_id,
        &user.role,
        params.unread_only.unwrap_or(true),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(ApiResponse::ok(notifications))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCount>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id, &user.role).await?;
    Ok(ApiResponse::ok(UnreadCount { count }))
}

/// POST /api/v1/notifications/{id}/read
///
/// 404 when the notification does not exist, 403 when it exists but is
/// addressed to someone else.
pub async fn mark_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiResponse<Notification>> {
    let notification = NotificationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;

    if !is_visible_to(
        notification.recipient_id,
        notification.recipient_role.as_deref(),
        &viewer(&user),
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot modify this notification".into(),
        )));
    }

    let updated = NotificationRepo::mark_read(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;
    Ok(ApiResponse::ok(updated))
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MarkAllReadResponse>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, user.user_id, &user.role).await?;
    Ok(ApiResponse::ok(MarkAllReadResponse { updated })
        .with_message("All notifications marked as read"))
}

/// POST /api/v1/notifications/create
///
/// Insert a notification and push it to the recipient's room.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateNotification>,
) -> AppResult<ApiResponse<Notification>> {
    validate_content(&input.notification_type, &input.message)?;
    let target =
        NotificationTarget::from_parts(input.recipient_id, input.recipient_role.as_deref())?;

    let notification = notify(
        &state.pool,
        &state.ws_manager,
        &target,
        &input.notification_type,
        input.message.trim(),
        input.link.as_deref(),
    )
    .await?;
    Ok(ApiResponse::created(notification).with_message("Notification created"))
}
