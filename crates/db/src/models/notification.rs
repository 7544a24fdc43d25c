//! Notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wedplan_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
///
/// Exactly one of `recipient_id` / `recipient_role` is set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub recipient_id: Option<DbId>,
    pub recipient_role: Option<String>,
    pub link: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub recipient_id: Option<DbId>,
    pub recipient_role: Option<String>,
    pub link: Option<String>,
}
