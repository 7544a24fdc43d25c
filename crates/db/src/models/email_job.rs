//! Outbound email job model.

use serde::Serialize;
use sqlx::FromRow;
use wedplan_core::types::{DbId, Timestamp};

pub const STATUS_QUEUED: &str = "queued";
pub const STATUS_SENDING: &str = "sending";
pub const STATUS_SENT: &str = "sent";
pub const STATUS_FAILED: &str = "failed";

/// A row from the `email_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailJob {
    pub id: DbId,
    /// Serialized message (recipient, subject, bodies, base64 attachments).
    pub payload: serde_json::Value,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub claimed_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
