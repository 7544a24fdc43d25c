use wedplan_core::notification::{NotificationTarget, EVENT_NEW_NOTIFICATION};
use wedplan_db::models::notification::Notification;
use wedplan_db::repositories::NotificationRepo;
use wedplan_db::DbPool;

use crate::ws::WsManager;

/// Persist a notification, then push it to the target's room.
///
/// The push is fire-and-forget: a serialization failure is logged and the
/// stored notification is still returned. Offline users see it on their next
/// list call.
pub async fn notify(
    pool: &DbPool,
    ws_manager: &WsManager,
    target: &NotificationTarget,
    notification_type: &str,
    message: &str,
    link: Option<&str>,
) -> Result<Notification, sqlx::Error> {
    let notification =
        NotificationRepo::create(pool, target, notification_type, message, link).await?;

    let room = target.room();
    match ws_manager
        .emit(&room, EVENT_NEW_NOTIFICATION, &notification)
        .await
    {
        Ok(delivered) => tracing::debug!(
            notification_id = notification.id,
            room = %room,
            delivered,
            "Notification pushed"
        ),
        Err(e) => tracing::warn!(
            notification_id = notification.id,
            error = %e,
            "Failed to push notification"
        ),
    }

    Ok(notification)
}
