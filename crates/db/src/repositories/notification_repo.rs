//! Repository for the `notifications` table.
//!
//! Visibility matches `wedplan_core::notification::is_visible_to`: a row is
//! visible when `recipient_id` is the viewer or `recipient_role` is the
//! viewer's role.

use sqlx::PgPool;
use wedplan_core::notification::NotificationTarget;
use wedplan_core::types::DbId;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, message, notification_type, recipient_id, recipient_role, link, \
                       is_read, read_at, created_at";

/// Visibility predicate over binds `$1` (user id) and `$2` (role).
const VISIBLE_TO: &str = "(recipient_id = $1 OR recipient_role = $2)";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification for `target`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        target: &NotificationTarget,
        notification_type: &str,
        message: &str,
        link: Option<&str>,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (message, notification_type, recipient_id, recipient_role, link) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(message)
            .bind(notification_type)
            .bind(target.recipient_id())
            .bind(target.recipient_role())
            .bind(link)
            .fetch_one(pool)
            .await
    }

    /// Find a notification by ID regardless of recipient.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List notifications visible to a user, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE {VISIBLE_TO} {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read, returning the updated row.
    ///
    /// Callers check visibility first; this only flips the flag.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark every unread notification visible to a user as read.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE {VISIBLE_TO} AND is_read = false"
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(role)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications visible to a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId, role: &str) -> Result<i64, sqlx::Error> {
        let query =
            format!("SELECT COUNT(*) FROM notifications WHERE {VISIBLE_TO} AND is_read = false");
        let count: Option<i64> = sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(role)
            .fetch_one(pool)
            .await?;
        Ok(count.unwrap_or(0))
    }
}
